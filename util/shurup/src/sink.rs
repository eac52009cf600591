// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Output sinks for harness text.
//!
//! The runner writes into any [`core::fmt::Write`]. [`Console`] is the
//! default and goes to standard output (or to a platform hook without
//! `std`). [`LineBufferedSink`] adapts the character stream into whole lines
//! for line-oriented logging channels such as a mobile system log.

use alloc::string::String;
use core::fmt::{self, Write};

#[cfg(any(
    feature = "platform-log",
    all(feature = "platform-console", not(feature = "std"))
))]
use crate_interface::call_interface;

/// Console hook provided by the platform when `std` is unavailable.
#[cfg(all(feature = "platform-console", not(feature = "std")))]
#[crate_interface::def_interface]
pub trait ConsoleIf {
    fn write_str(s: &str);
}

/// Line-oriented logging call provided by the hosting platform.
///
/// Receives a tag identifying the producer and one line of text, without the
/// line terminator.
#[cfg(feature = "platform-log")]
#[crate_interface::def_interface]
pub trait PlatformLog {
    fn log_line(tag: &str, line: &str);
}

/// Default output of the harness.
///
/// Available with `std`, or with `platform-console` on targets without it.
#[cfg(any(feature = "std", feature = "platform-console"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct Console;

#[cfg(any(feature = "std", feature = "platform-console"))]
impl Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        cfg_if::cfg_if! {
            if #[cfg(feature = "std")] {
                std::print!("{s}");
            } else {
                call_interface!(ConsoleIf::write_str, s);
            }
        }
        Ok(())
    }
}

/// Receiver of complete lines.
///
/// Implementations are assumed not to fail; the sink never retries.
pub trait LineLogger {
    fn log_line(&mut self, tag: &str, line: &str);
}

impl<F> LineLogger for F
where
    F: FnMut(&str, &str),
{
    fn log_line(&mut self, tag: &str, line: &str) {
        self(tag, line)
    }
}

/// Forwards lines to the `log` facade, using the tag as the record target.
#[derive(Debug, Clone, Copy)]
pub struct LogLineLogger {
    level: log::Level,
}

impl LogLineLogger {
    pub const fn new(level: log::Level) -> Self {
        Self { level }
    }
}

impl Default for LogLineLogger {
    fn default() -> Self {
        Self::new(log::Level::Info)
    }
}

impl LineLogger for LogLineLogger {
    fn log_line(&mut self, tag: &str, line: &str) {
        log!(target: tag, self.level, "{line}");
    }
}

/// Forwards lines to the platform's [`PlatformLog`] implementation.
#[cfg(feature = "platform-log")]
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformLineLogger;

#[cfg(feature = "platform-log")]
impl LineLogger for PlatformLineLogger {
    fn log_line(&mut self, tag: &str, line: &str) {
        call_interface!(PlatformLog::log_line, tag, line);
    }
}

/// Accumulates characters and hands complete lines to a [`LineLogger`].
///
/// Carriage returns are dropped and empty lines are never forwarded. A
/// partial last line is forwarded when the sink is dropped.
pub struct LineBufferedSink<L: LineLogger> {
    tag: String,
    // Never holds a '\n'.
    buffer: String,
    logger: L,
}

impl<L: LineLogger> LineBufferedSink<L> {
    pub fn new(tag: impl Into<String>, logger: L) -> Self {
        Self {
            tag: tag.into(),
            buffer: String::new(),
            logger,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The incomplete line collected so far.
    pub fn buffered(&self) -> &str {
        &self.buffer
    }

    pub fn put_char(&mut self, c: char) {
        match c {
            '\r' => {}
            '\n' => {
                if !self.buffer.is_empty() {
                    self.forward();
                }
            }
            c => self.buffer.push(c),
        }
    }

    /// Forwards the partial line, if any, without waiting for a newline.
    pub fn flush(&mut self) {
        if !self.buffer.is_empty() {
            self.forward();
        }
    }

    fn forward(&mut self) {
        self.logger.log_line(&self.tag, &self.buffer);
        self.buffer.clear();
    }
}

impl<L: LineLogger> Write for LineBufferedSink<L> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        s.chars().for_each(|c| self.put_char(c));
        Ok(())
    }

    fn write_char(&mut self, c: char) -> fmt::Result {
        self.put_char(c);
        Ok(())
    }
}

impl<L: LineLogger> Drop for LineBufferedSink<L> {
    fn drop(&mut self) {
        self.flush();
    }
}

impl<L: LineLogger> fmt::Debug for LineBufferedSink<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineBufferedSink")
            .field("tag", &self.tag)
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}
