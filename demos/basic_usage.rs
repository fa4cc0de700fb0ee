#!/usr/bin/env rust

//! Basic usage example of the stagebuf dual-mode buffer manager

use stagebuf::{BufferManager, ManagerConfig, Result};

fn stage(manager: &mut BufferManager, payload: &[u8]) -> Result<()> {
    let ptr = manager.push_back(payload.len())?;
    unsafe {
        std::ptr::copy_nonoverlapping(payload.as_ptr(), ptr.as_ptr(), payload.len());
    }
    Ok(())
}

fn drain(manager: &mut BufferManager) -> Result<Vec<u8>> {
    let view = manager.front()?;
    let bytes =
        unsafe { std::slice::from_raw_parts(view.data().as_ptr(), view.size()).to_vec() };
    manager.pop_front(bytes.len(), true)?;
    Ok(bytes)
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    println!("Stagebuf Buffer Manager Example");
    println!("===============================");

    // Dynamic mode: every frame gets its own heap block
    let mut manager = BufferManager::new();
    manager.set_limit(1024 * 1024, 256);

    println!("\nStaging frames in dynamic mode...");
    stage(&mut manager, b"frame-one")?;
    stage(&mut manager, b"frame-two")?;
    println!("  Live blocks: {}", manager.limit().cost_count);
    println!("  Reserved bytes: {}", manager.limit().cost_bytes);

    while !manager.empty() {
        let frame = drain(&mut manager)?;
        println!("  Drained: {}", String::from_utf8_lossy(&frame));
    }

    // Static mode: one circular region, records carry a varint prefix
    let config = ManagerConfig::fixed(4096).with_max_blocks(32);
    let mut manager = BufferManager::with_config(config)?;

    println!("\nStaging frames in static mode...");
    stage(&mut manager, b"ring-frame-A")?;
    stage(&mut manager, b"ring-frame-B")?;

    // Extend the newest record instead of reserving another one
    let extension = manager.merge_back(6)?;
    unsafe {
        std::ptr::copy_nonoverlapping(b"-tail!".as_ptr(), extension.as_ptr(), 6);
    }

    let records = manager.static_ring().expect("static mode").walk()?;
    println!("  Ring records:");
    for record in &records {
        println!("    offset {:4}  capacity {}", record.offset, record.capacity);
    }

    while !manager.empty() {
        let frame = drain(&mut manager)?;
        println!("  Drained: {}", String::from_utf8_lossy(&frame));
    }

    println!("\nExample completed successfully!");
    Ok(())
}
