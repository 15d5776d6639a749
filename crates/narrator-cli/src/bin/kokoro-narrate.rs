//! Expressive narration with Kokoro.

use narrator_cli::{main_with, KokoroCli};
use std::process::ExitCode;

fn main() -> ExitCode {
    main_with::<KokoroCli>()
}
