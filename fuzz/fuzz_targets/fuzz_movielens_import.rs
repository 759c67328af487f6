#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use reelstats_core::Schema;
use reelstats_store::{import_readers, ConnectionDescriptor, SqliteExecutor};

#[derive(Arbitrary, Debug)]
struct Input {
    movies: Vec<u8>,
    ratings: Vec<u8>,
}

fuzz_target!(|input: Input| {
    // Limit file sizes to prevent timeout
    if input.movies.len() > 4096 || input.ratings.len() > 4096 {
        return;
    }

    if let Ok(exec) = SqliteExecutor::open(&ConnectionDescriptor::Memory) {
        let _ = import_readers(
            &exec,
            &Schema::default(),
            input.movies.as_slice(),
            input.ratings.as_slice(),
        );
    }
});
