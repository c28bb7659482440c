#![feature(test)]
extern crate memfit;
extern crate test;
#[macro_use]
extern crate trackable;

use memfit::allocator::{MemoryAllocator, Strategy};
use memfit::process::ProcessId;
use test::Bencher;

fn fragmented_allocator(capacity: u64) -> MemoryAllocator {
    let mut allocator = track_try_unwrap!(MemoryAllocator::create(capacity));
    for i in 0..(capacity / 20) {
        let id = ProcessId::new(format!("P{}", i));
        track_try_unwrap!(allocator.allocate(Strategy::BestFit, id, 10));
    }
    // 一つおきに解放して、ホールだらけのテーブルを作る
    for i in (0..(capacity / 20)).step_by(2) {
        let id = ProcessId::new(format!("P{}", i));
        track_try_unwrap!(allocator.release(&id));
    }
    allocator
}

#[bench]
fn best_fit_allocate_release(b: &mut Bencher) {
    let mut allocator = fragmented_allocator(10_240);
    let id = ProcessId::new("bench");
    b.iter(|| {
        track_try_unwrap!(allocator.allocate(Strategy::BestFit, id.clone(), 10));
        track_try_unwrap!(allocator.release(&id));
    });
}

#[bench]
fn worst_fit_allocate_release(b: &mut Bencher) {
    let mut allocator = fragmented_allocator(10_240);
    let id = ProcessId::new("bench");
    b.iter(|| {
        track_try_unwrap!(allocator.allocate(Strategy::WorstFit, id.clone(), 10));
        track_try_unwrap!(allocator.release(&id));
    });
}

#[bench]
fn next_fit_allocate_release(b: &mut Bencher) {
    let mut allocator = fragmented_allocator(10_240);
    let id = ProcessId::new("bench");
    b.iter(|| {
        track_try_unwrap!(allocator.allocate(Strategy::NextFit, id.clone(), 10));
        track_try_unwrap!(allocator.release(&id));
    });
}
