//! Platform encodings of the `<fenv.h>` constants.
//!
//! The C library expresses rounding modes and exception flags as `c_int` values whose bit
//! positions follow the hardware control/status register of each architecture:
//!
//! | Architecture | Rounding field      | Flag bits (INV/DZ/OF/UF/NX)     | Register     |
//! |--------------|---------------------|---------------------------------|--------------|
//! | x86, x86_64  | `0x000`..`0xc00`    | `0x01/0x04/0x08/0x10/0x20`      | x87 + MXCSR  |
//! | aarch64      | `0x000`..`0xc00000` | `0x01/0x02/0x04/0x08/0x10`      | FPCR / FPSR  |
//! | riscv64      | `0`..`3`            | `0x10/0x08/0x04/0x02/0x01`      | `fcsr`       |
//!
//! x86 has a denormal-operand status bit (`0x02`), but the C library masks it out of every
//! flag call, so no layout reports `DENORM` as implemented.

use libc::c_int;

use crate::exceptions::{ExceptionFlag, ExceptionFlags};
use crate::rounding::RoundingMode;

/// How one platform encodes the environment in `<fenv.h>` terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformLayout {
    /// Short platform name for diagnostics.
    pub name: &'static str,
    /// Raw encodings indexed by [`RoundingMode::number`].
    pub rounding: [c_int; 4],
    /// Raw flag bits indexed by [`ExceptionFlag::bit`]; `None` when not implemented.
    pub flags: [Option<c_int>; 6],
    /// Whether `feenableexcept`/`fedisableexcept` are available.
    pub traps: bool,
}

impl PlatformLayout {
    /// Raw encoding of `mode`.
    #[inline]
    pub const fn mode_bits(&self, mode: RoundingMode) -> c_int {
        self.rounding[mode.number() as usize]
    }

    /// Decodes a raw rounding value, or `None` when it matches none of the four modes.
    pub fn mode_from_bits(&self, raw: c_int) -> Option<RoundingMode> {
        RoundingMode::ALL.into_iter().find(|&mode| self.mode_bits(mode) == raw)
    }

    /// Raw mask for the implemented members of `flags`; unimplemented flags contribute nothing.
    pub fn flag_mask(&self, flags: ExceptionFlags) -> c_int {
        flags
            .iter()
            .filter_map(|flag| self.flags[flag.bit() as usize])
            .fold(0, |mask, bits| mask | bits)
    }

    /// Flags whose raw bits are set in `raw`.
    pub fn flags_from_mask(&self, raw: c_int) -> ExceptionFlags {
        ExceptionFlag::ALL
            .into_iter()
            .filter(|flag| self.flags[flag.bit() as usize].is_some_and(|bits| raw & bits != 0))
            .collect()
    }

    /// Flags this platform implements.
    pub fn supported_flags(&self) -> ExceptionFlags {
        ExceptionFlag::ALL
            .into_iter()
            .filter(|flag| self.flags[flag.bit() as usize].is_some())
            .collect()
    }
}

/// x86 and x86_64 (x87 control word and MXCSR share the encoding).
pub const X86: PlatformLayout = PlatformLayout {
    name: "x86",
    rounding: [0x000, 0x400, 0x800, 0xc00],
    flags: [Some(0x01), None, Some(0x04), Some(0x08), Some(0x10), Some(0x20)],
    traps: cfg!(all(target_os = "linux", target_env = "gnu")),
};

/// `AArch64` (FPCR.RMode at bits 23:22, FPSR cumulative flags at bits 4:0).
pub const AARCH64: PlatformLayout = PlatformLayout {
    name: "aarch64",
    rounding: [0x000000, 0x800000, 0x400000, 0xc00000],
    flags: [Some(0x01), None, Some(0x02), Some(0x04), Some(0x08), Some(0x10)],
    traps: cfg!(all(target_os = "linux", target_env = "gnu")),
};

/// RISC-V 64 (`fcsr.frm` values, `fcsr.fflags` bits).
pub const RISCV64: PlatformLayout = PlatformLayout {
    name: "riscv64",
    rounding: [0, 2, 3, 1],
    flags: [Some(0x10), None, Some(0x08), Some(0x04), Some(0x02), Some(0x01)],
    traps: false,
};

/// Layout of the compilation target, when it has a per-thread environment this crate drives.
#[cfg(all(
    any(target_os = "linux", target_os = "android", target_os = "macos"),
    target_endian = "little",
    any(target_arch = "x86", target_arch = "x86_64")
))]
pub const HOST: Option<&PlatformLayout> = Some(&X86);

/// Layout of the compilation target, when it has a per-thread environment this crate drives.
#[cfg(all(
    any(target_os = "linux", target_os = "android", target_os = "macos"),
    target_endian = "little",
    target_arch = "aarch64"
))]
pub const HOST: Option<&PlatformLayout> = Some(&AARCH64);

/// Layout of the compilation target, when it has a per-thread environment this crate drives.
#[cfg(all(target_os = "linux", target_endian = "little", target_arch = "riscv64"))]
pub const HOST: Option<&PlatformLayout> = Some(&RISCV64);

/// Layout of the compilation target, when it has a per-thread environment this crate drives.
#[cfg(not(any(
    all(
        any(target_os = "linux", target_os = "android", target_os = "macos"),
        target_endian = "little",
        any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")
    ),
    all(target_os = "linux", target_endian = "little", target_arch = "riscv64")
)))]
pub const HOST: Option<&PlatformLayout> = None;
