// Copyright 2026 OpenStack i18n contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use fern::Dispatch;
use log::{LevelFilter, SetLoggerError};

/// Install a logger writing to stderr.
///
/// Warnings and errors are always shown, `verbosity` 1 adds progress
/// counts and 2 or more adds per-entry details.
pub fn setup_logger(verbosity: u8) -> Result<(), SetLoggerError> {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    Dispatch::new()
        .format(move |out, message, record| {
            let (color, reset) = match record.level() {
                log::Level::Error => ("\x1b[31m", "\x1b[0m"),
                log::Level::Warn => ("\x1b[33m", "\x1b[0m"),
                log::Level::Info | log::Level::Debug | log::Level::Trace => ("", ""),
            };
            if verbosity > 1 {
                out.finish(format_args!(
                    "{color}{}: ({}) {message}{reset}",
                    record.level(),
                    record.target()
                ))
            } else {
                out.finish(format_args!("{color}{}: {message}{reset}", record.level()))
            }
        })
        .level(level)
        .chain(std::io::stderr())
        .apply()
}
