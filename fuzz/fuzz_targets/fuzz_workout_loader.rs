#![no_main]

use libfuzzer_sys::fuzz_target;
use tabata::config::loader::ConfigLoader;
use tabata::playback::PlaybackEngine;

fuzz_target!(|data: &[u8]| {
    let Ok(yaml) = std::str::from_utf8(data) else {
        return;
    };
    let loader = ConfigLoader::with_defaults();

    // Anything that passes validation must flatten and play without panicking
    if let Ok(result) = loader.load_from_str(yaml) {
        let mut engine = PlaybackEngine::new(result.config.intervals());
        engine.start();
        for _ in 0..64 {
            engine.tick();
        }
        engine.reset();
    }
});
