//! Member access flags.

use bitflags::bitflags;

bitflags! {
    /// How a member may be accessed.
    ///
    /// The compiler only reads members carrying `READ` and only writes
    /// members carrying `WRITE`.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct MemberAccess: u8 {
        const READ = 1 << 0;
        const WRITE = 1 << 1;

        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

impl MemberAccess {
    #[inline]
    pub fn is_readable(self) -> bool {
        self.contains(Self::READ)
    }

    #[inline]
    pub fn is_writable(self) -> bool {
        self.contains(Self::WRITE)
    }
}

impl Default for MemberAccess {
    fn default() -> Self {
        Self::READ_WRITE
    }
}
