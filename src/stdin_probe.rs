//! Non-blocking probe for the external shutdown request (§5, §9 Design
//! Notes: "implement with an OS-level availability probe rather than a
//! background reader task").
//!
//! A single ASCII end-of-text byte (0x03) on standard input requests
//! graceful shutdown. Polling must never block the supervision task, so
//! the probe puts stdin's file descriptor into non-blocking mode once
//! and reads at most one byte per call, discarding anything that is not
//! the end-of-text byte.

#[cfg(unix)]
mod imp {
    use std::io::Read;
    use std::os::unix::io::AsRawFd;
    use std::sync::OnceLock;

    use nix::fcntl::{fcntl, FcntlArg, OFlag};

    const END_OF_TEXT: u8 = 0x03;

    fn ensure_nonblocking() {
        static DONE: OnceLock<()> = OnceLock::new();
        DONE.get_or_init(|| {
            let fd = std::io::stdin().as_raw_fd();
            if let Ok(flags) = fcntl(fd, FcntlArg::F_GETFL) {
                let flags = OFlag::from_bits_truncate(flags) | OFlag::O_NONBLOCK;
                let _ = fcntl(fd, FcntlArg::F_SETFL(flags));
            }
        });
    }

    pub fn end_of_text_requested() -> bool {
        ensure_nonblocking();
        let mut byte = [0u8; 1];
        match std::io::stdin().read(&mut byte) {
            Ok(1) => byte[0] == END_OF_TEXT,
            _ => false,
        }
    }
}

#[cfg(not(unix))]
mod imp {
    /// No non-blocking stdin primitive on this platform; external
    /// cancellation still works via timeout and engine-fatal detection.
    pub fn end_of_text_requested() -> bool {
        false
    }
}

/// `true` iff the end-of-text byte (0x03) is currently available on
/// standard input. Never blocks.
pub fn end_of_text_requested() -> bool {
    imp::end_of_text_requested()
}
