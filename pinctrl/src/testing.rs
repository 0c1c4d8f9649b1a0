//! In-memory register window and log capture for unit tests

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::ops::Range;
use core::sync::atomic::{AtomicU32, Ordering};
use log::{Level, LevelFilter, Log, Metadata, Record};
use spin::Mutex;

use crate::mmio::RegisterWindow;

/// Register array with optional write-1-to-clear ranges and a write log.
pub struct FakeWindow {
    words: Vec<AtomicU32>,
    w1c: Mutex<Vec<Range<usize>>>,
    log: Mutex<Vec<(usize, u32)>>,
}

impl FakeWindow {
    pub fn new(len: usize) -> Self {
        Self {
            words: (0..len / 4).map(|_| AtomicU32::new(0)).collect(),
            w1c: Mutex::new(Vec::new()),
            log: Mutex::new(Vec::new()),
        }
    }

    /// Makes writes in `range` clear the written bits instead of storing.
    pub fn write_one_to_clear(&self, range: Range<usize>) {
        self.w1c.lock().push(range);
    }

    /// Sets a register behind the driver's back, unlogged.
    pub fn poke(&self, offset: usize, value: u32) {
        self.words[offset / 4].store(value, Ordering::SeqCst);
    }

    pub fn peek(&self, offset: usize) -> u32 {
        self.words[offset / 4].load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<(usize, u32)> {
        self.log.lock().clone()
    }

    pub fn clear_log(&self) {
        self.log.lock().clear();
    }
}

impl RegisterWindow for FakeWindow {
    fn len(&self) -> usize {
        self.words.len() * 4
    }

    fn read32(&self, offset: usize) -> u32 {
        assert!(offset % 4 == 0 && offset < self.len(), "read at {:#x}", offset);
        self.peek(offset)
    }

    fn write32(&self, offset: usize, value: u32) {
        assert!(offset % 4 == 0 && offset < self.len(), "write at {:#x}", offset);
        self.log.lock().push((offset, value));
        let word = &self.words[offset / 4];
        if self.w1c.lock().iter().any(|r| r.contains(&offset)) {
            word.fetch_and(!value, Ordering::SeqCst);
        } else {
            word.store(value, Ordering::SeqCst);
        }
    }
}

static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        RECORDS
            .lock()
            .push((record.level(), format!("{}", record.args())));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Routes `log` records of every test into one shared buffer.
pub fn capture_logs() {
    // already installed by another test
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Trace);
}

/// Whether any test logged a `level` message containing `text`.
pub fn logged(level: Level, text: &str) -> bool {
    RECORDS
        .lock()
        .iter()
        .any(|(l, message)| *l == level && message.contains(text))
}
