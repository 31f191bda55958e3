use std::{env, io};

use randstream::{DataType, Jitter, Producer};

fn main() {
    let seed = env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0);
    let producer = match Producer::new(DataType::Binary, seed, u64::MAX) {
        Ok(producer) => producer.with_jitter(Jitter::disabled()),
        Err(err) => {
            eprintln!("{err}");
            return;
        }
    };
    let mut output = io::stdout().lock();
    producer.write_to(&mut output).ok();
}
