use thiserror::Error;

// Three kinds of failure. Everything the guest program can observe (reads of
// unusable regions, writes to ROM, bank 0 selection) is normalized silently
// and never reported through here.
#[derive(Debug, Error)]
pub enum Error {
    // The ROM image ends before the cartridge header does. The cartridge
    // factory recovers from this by falling back to a plain ROM mapping.
    #[error("rom image is {0} bytes, the cartridge header needs at least 0x150")]
    MalformedHeader(usize),
    // A bank controller this core only stubs. Execution continues on the
    // nearest implemented controller.
    #[error("unsupported memory bank controller: {0}")]
    Unsupported(String),
    // Continuing to emulate is meaningless. Reported to the host, which is
    // expected to stop the tick loop.
    #[error("fatal: {0}")]
    Fatal(String),
}
