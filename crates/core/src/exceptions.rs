//! Floating-point exception (sticky) flags.
//!
//! Six flags are defined, numbered by bit position:
//!
//! | Bit | Flag        | Description                  |
//! |-----|-------------|------------------------------|
//! |  0  | `INVALID`   | Invalid Operation            |
//! |  1  | `DENORM`    | Denormal operand (x87 only)  |
//! |  2  | `DIVBYZERO` | Divide by Zero               |
//! |  3  | `OVERFLOW`  | Overflow                     |
//! |  4  | `UNDERFLOW` | Underflow                    |
//! |  5  | `INEXACT`   | Inexact                      |
//!
//! Flags are raised by arithmetic and stay raised until cleared. The register never sets a
//! flag by itself and has no coupling between flags: that overflow also signals inexact is a
//! property of the operation that overflowed.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not, Sub};
use std::str::FromStr;

use serde::Deserialize;
use tracing::{debug, trace, warn};

use crate::common::error::{FenvError, FlagError, Result};
use crate::common::strip_fe_prefix;
use crate::env::{FpBackend, FpEnv};

/// One IEEE-754 exception flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "String")]
#[repr(u8)]
pub enum ExceptionFlag {
    /// Invalid operation (e.g. `0/0`, `sqrt(-1)`).
    Invalid = 0,
    /// Operation on a denormal operand.
    Denorm = 1,
    /// Exact infinite result from finite operands (e.g. `1/0`).
    DivByZero = 2,
    /// Rounded result too large in magnitude.
    Overflow = 3,
    /// Result tiny and inexact.
    Underflow = 4,
    /// Rounded result differs from the exact result.
    Inexact = 5,
}

impl ExceptionFlag {
    /// Every flag, ordered by bit.
    pub const ALL: [Self; 6] = [
        Self::Invalid,
        Self::Denorm,
        Self::DivByZero,
        Self::Overflow,
        Self::Underflow,
        Self::Inexact,
    ];

    /// Bit number (0..=5).
    #[inline]
    pub const fn bit(self) -> u8 {
        self as u8
    }

    /// Single-bit mask (`1 << bit`).
    #[inline]
    pub const fn mask(self) -> u8 {
        1 << self.bit()
    }

    /// Decodes a bit number.
    ///
    /// # Errors
    ///
    /// [`FenvError::InvalidFlag`] for bit numbers outside `0..=5`.
    pub const fn from_bit(bit: u32) -> Result<Self> {
        match bit {
            0 => Ok(Self::Invalid),
            1 => Ok(Self::Denorm),
            2 => Ok(Self::DivByZero),
            3 => Ok(Self::Overflow),
            4 => Ok(Self::Underflow),
            5 => Ok(Self::Inexact),
            _ => Err(FenvError::InvalidFlag(FlagError::Bit(bit))),
        }
    }

    /// Upper-case name as used by `<fenv.h>` (`FE_INVALID` without the prefix).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Invalid => "INVALID",
            Self::Denorm => "DENORM",
            Self::DivByZero => "DIVBYZERO",
            Self::Overflow => "OVERFLOW",
            Self::Underflow => "UNDERFLOW",
            Self::Inexact => "INEXACT",
        }
    }
}

impl fmt::Display for ExceptionFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExceptionFlag {
    type Err = FenvError;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let name = strip_fe_prefix(trimmed);
        let name = if name.eq_ignore_ascii_case("DENORMAL") { "DENORM" } else { name };
        Self::ALL
            .into_iter()
            .find(|flag| flag.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| FenvError::InvalidFlag(FlagError::Name(s.to_owned())))
    }
}

impl TryFrom<String> for ExceptionFlag {
    type Error = FenvError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl TryFrom<u8> for ExceptionFlag {
    type Error = FenvError;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_bit(value.into())
    }
}

/// A set of exception flags (bit `n` holds the flag numbered `n`).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ExceptionFlags(u8);

impl ExceptionFlags {
    /// No flags.
    pub const EMPTY: Self = Self(0);
    /// All six flags.
    pub const ALL: Self = Self(0b11_1111);
    /// The five C99 flags: everything but `DENORM`.
    pub const STANDARD: Self = Self(0b11_1101);

    /// Builds a set from a raw 6-bit mask.
    ///
    /// # Errors
    ///
    /// [`FenvError::InvalidFlag`] when bits above bit 5 are set.
    pub const fn from_mask(mask: u64) -> Result<Self> {
        if mask & !(Self::ALL.0 as u64) != 0 {
            return Err(FenvError::InvalidFlag(FlagError::Mask(mask)));
        }
        Ok(Self(mask as u8))
    }

    /// Raw 6-bit mask.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if no flags are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of flags in the set.
    #[inline]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns true if every flag of `other` is in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Returns true if `flag` is in the set.
    #[inline]
    pub const fn has(self, flag: ExceptionFlag) -> bool {
        self.0 & flag.mask() != 0
    }

    /// Flags in bit order.
    pub const fn iter(self) -> Iter {
        Iter { set: self, next: 0 }
    }
}

impl fmt::Debug for ExceptionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for ExceptionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, flag) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(flag.name())?;
        }
        f.write_str("}")
    }
}

impl From<ExceptionFlag> for ExceptionFlags {
    fn from(flag: ExceptionFlag) -> Self {
        Self(flag.mask())
    }
}

impl FromIterator<ExceptionFlag> for ExceptionFlags {
    fn from_iter<I: IntoIterator<Item = ExceptionFlag>>(iter: I) -> Self {
        iter.into_iter().fold(Self::EMPTY, |set, flag| set | flag)
    }
}

impl IntoIterator for ExceptionFlags {
    type Item = ExceptionFlag;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        self.iter()
    }
}

/// Iterator over the flags of an [`ExceptionFlags`], in bit order.
#[derive(Clone, Debug)]
pub struct Iter {
    set: ExceptionFlags,
    next: u8,
}

impl Iterator for Iter {
    type Item = ExceptionFlag;

    fn next(&mut self) -> Option<ExceptionFlag> {
        while let Some(&flag) = ExceptionFlag::ALL.get(self.next as usize) {
            self.next += 1;
            if self.set.has(flag) {
                return Some(flag);
            }
        }
        None
    }
}

impl BitOr for ExceptionFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOr<ExceptionFlag> for ExceptionFlags {
    type Output = Self;

    fn bitor(self, rhs: ExceptionFlag) -> Self {
        Self(self.0 | rhs.mask())
    }
}

impl BitOr for ExceptionFlag {
    type Output = ExceptionFlags;

    fn bitor(self, rhs: Self) -> ExceptionFlags {
        ExceptionFlags(self.mask() | rhs.mask())
    }
}

impl BitOr<ExceptionFlags> for ExceptionFlag {
    type Output = ExceptionFlags;

    fn bitor(self, rhs: ExceptionFlags) -> ExceptionFlags {
        rhs | self
    }
}

impl BitOrAssign for ExceptionFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitOrAssign<ExceptionFlag> for ExceptionFlags {
    fn bitor_assign(&mut self, rhs: ExceptionFlag) {
        self.0 |= rhs.mask();
    }
}

impl BitAnd for ExceptionFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Sub for ExceptionFlags {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 & !rhs.0)
    }
}

impl Not for ExceptionFlags {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0 & Self::ALL.0)
    }
}

/// Sticky-flag register of one environment handle.
#[derive(Debug)]
pub struct ExceptionRegister<'a, B: FpBackend> {
    env: &'a FpEnv<B>,
}

impl<'a, B: FpBackend> ExceptionRegister<'a, B> {
    pub(crate) const fn new(env: &'a FpEnv<B>) -> Self {
        Self { env }
    }

    /// Returns the members of `flags` that are currently raised. Reading has no side effect.
    ///
    /// `test(ExceptionFlags::ALL)` returns every raised flag.
    pub fn test(&self, flags: impl Into<ExceptionFlags>) -> ExceptionFlags {
        let flags = flags.into();
        let layout = self.env.layout();
        let raw = self.env.backend().test_except(layout.flag_mask(flags));
        let raised = layout.flags_from_mask(raw) & flags;
        trace!(%flags, %raised, "tested exception flags");
        raised
    }

    /// Clears the members of `flags`; others are untouched. Clearing a clear flag is a no-op.
    ///
    /// # Errors
    ///
    /// [`FenvError::Environment`] if `feclearexcept` fails.
    pub fn clear(&self, flags: impl Into<ExceptionFlags>) -> Result<()> {
        let flags = flags.into();
        let mask = self.env.layout().flag_mask(flags);
        if self.env.backend().clear_except(mask) != 0 {
            return Err(FenvError::Environment { call: "feclearexcept" });
        }
        debug!(%flags, "cleared exception flags");
        Ok(())
    }

    /// Raises the members of `flags` without performing any computation.
    ///
    /// With a trap enabled for one of them, the thread receives `SIGFPE`.
    ///
    /// # Errors
    ///
    /// [`FenvError::UnsupportedFlag`] if the platform lacks one of the flags (nothing is raised
    /// then), or [`FenvError::Environment`] if `feraiseexcept` fails.
    pub fn raise(&self, flags: impl Into<ExceptionFlags>) -> Result<()> {
        let flags = flags.into();
        let layout = self.env.layout();
        self.check_supported(flags)?;
        if flags.is_empty() {
            return Ok(());
        }
        if self.env.backend().raise_except(layout.flag_mask(flags)) != 0 {
            return Err(FenvError::Environment { call: "feraiseexcept" });
        }
        debug!(%flags, "raised exception flags");
        Ok(())
    }

    /// Per-flag view bound to this register.
    pub const fn flag(&self, flag: ExceptionFlag) -> FlagView<'a, B> {
        FlagView { env: self.env, flag }
    }

    /// Captures the state of the members of `flags`.
    pub fn save(&self, flags: impl Into<ExceptionFlags>) -> SavedFlags {
        let flags = flags.into();
        SavedFlags { flags, raised: self.test(flags), _thread: PhantomData }
    }

    /// Puts the members of `flags` back into the state recorded in `saved`.
    ///
    /// Flags outside `flags`, and flags that `saved` did not capture, are untouched. Unlike
    /// [`ExceptionRegister::raise`], restoring never delivers a trap.
    ///
    /// # Errors
    ///
    /// [`FenvError::Environment`] if `fesetexceptflag` fails.
    pub fn restore(&self, saved: &SavedFlags, flags: impl Into<ExceptionFlags>) -> Result<()> {
        let flags = flags.into() & saved.flags;
        let layout = self.env.layout();
        let values = layout.flag_mask(saved.raised & flags);
        if self.env.backend().set_except_state(values, layout.flag_mask(flags)) != 0 {
            return Err(FenvError::Environment { call: "fesetexceptflag" });
        }
        debug!(%flags, raised = %(saved.raised & flags), "restored exception flags");
        Ok(())
    }

    /// Flags whose traps are currently enabled.
    ///
    /// # Errors
    ///
    /// [`FenvError::TrapsUnsupported`] where trap control is unavailable.
    pub fn enabled_traps(&self) -> Result<ExceptionFlags> {
        let layout = self.env.layout();
        if !layout.traps {
            return Err(FenvError::TrapsUnsupported(ExceptionFlags::EMPTY));
        }
        let raw = self.env.backend().enabled_traps();
        if raw < 0 {
            return Err(FenvError::TrapsUnsupported(ExceptionFlags::EMPTY));
        }
        Ok(layout.flags_from_mask(raw))
    }

    /// Enables traps for `flags` and returns the previously enabled set.
    ///
    /// # Errors
    ///
    /// [`FenvError::UnsupportedFlag`] for flags the platform lacks, or
    /// [`FenvError::TrapsUnsupported`] if trap control is unavailable or refused.
    pub fn enable_traps(&self, flags: impl Into<ExceptionFlags>) -> Result<ExceptionFlags> {
        let flags = flags.into();
        let layout = self.env.layout();
        self.check_supported(flags)?;
        if !layout.traps {
            return Err(FenvError::TrapsUnsupported(flags));
        }
        let previous = self.env.backend().enable_traps(layout.flag_mask(flags));
        if previous < 0 {
            return Err(FenvError::TrapsUnsupported(flags));
        }
        debug!(%flags, "enabled traps");
        Ok(layout.flags_from_mask(previous))
    }

    /// Disables traps for `flags` and returns the previously enabled set.
    ///
    /// # Errors
    ///
    /// [`FenvError::TrapsUnsupported`] if trap control is unavailable or refused.
    pub fn disable_traps(&self, flags: impl Into<ExceptionFlags>) -> Result<ExceptionFlags> {
        let flags = flags.into();
        let layout = self.env.layout();
        if !layout.traps {
            return Err(FenvError::TrapsUnsupported(flags));
        }
        let previous = self.env.backend().disable_traps(layout.flag_mask(flags));
        if previous < 0 {
            return Err(FenvError::TrapsUnsupported(flags));
        }
        debug!(%flags, "disabled traps");
        Ok(layout.flags_from_mask(previous))
    }

    fn check_supported(&self, flags: ExceptionFlags) -> Result<()> {
        let missing = flags - self.env.layout().supported_flags();
        match missing.iter().next() {
            Some(flag) => {
                warn!(%flag, platform = self.env.layout().name, "flag not implemented");
                Err(FenvError::UnsupportedFlag(flag))
            }
            None => Ok(()),
        }
    }
}

/// One flag of a register, with its own `test`, `clear` and `raise`.
#[derive(Debug)]
pub struct FlagView<'a, B: FpBackend> {
    env: &'a FpEnv<B>,
    flag: ExceptionFlag,
}

impl<B: FpBackend> FlagView<'_, B> {
    /// The flag this view is bound to.
    pub const fn flag(&self) -> ExceptionFlag {
        self.flag
    }

    /// Whether the flag is raised.
    pub fn test(&self) -> bool {
        !self.env.exceptions().test(self.flag).is_empty()
    }

    /// Clears the flag.
    ///
    /// # Errors
    ///
    /// As [`ExceptionRegister::clear`].
    pub fn clear(&self) -> Result<()> {
        self.env.exceptions().clear(self.flag)
    }

    /// Raises the flag.
    ///
    /// # Errors
    ///
    /// As [`ExceptionRegister::raise`].
    pub fn raise(&self) -> Result<()> {
        self.env.exceptions().raise(self.flag)
    }
}

/// Captured state of a set of flags, for [`ExceptionRegister::restore`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SavedFlags {
    flags: ExceptionFlags,
    raised: ExceptionFlags,
    _thread: PhantomData<*const ()>,
}

impl SavedFlags {
    /// Flags whose state was captured.
    pub const fn flags(&self) -> ExceptionFlags {
        self.flags
    }

    /// Captured flags that were raised at the time.
    pub const fn raised(&self) -> ExceptionFlags {
        self.raised
    }
}
