use std::time::Instant;

use crate::{DataType, Jitter, Producer};

#[test]
#[ignore]
fn bench() {
    // Throughput of producing and verifying each built-in data type.
    // Run with `cargo test bench --release -- --ignored --nocapture`
    const SIZE: u64 = 1 << 28;

    let gigs = SIZE as f64 / (1u64 << 30) as f64;
    let producer = |data_type| {
        Producer::new(data_type, 1, SIZE)
            .unwrap()
            .with_jitter(Jitter::disabled())
    };

    println!("\nThroughputs:");
    for data_type in [DataType::Zero, DataType::Binary, DataType::Text] {
        let start = Instant::now();
        producer(data_type).write_to(&mut std::io::sink()).unwrap();
        let produce = start.elapsed().as_secs_f64();

        let source = producer(data_type);
        let consumer = source.verifier();
        let start = Instant::now();
        consumer.read_from(&mut &source).unwrap();
        consumer.close().unwrap();
        let verify = start.elapsed().as_secs_f64();

        println!("  {data_type:>6}: produce {:.3} GB/s", gigs / produce);
        println!("  {data_type:>6}: produce + verify {:.3} GB/s", gigs / verify);
    }
}
