use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TryFromPrimitive,
    IntoPrimitive,
    EnumString,
    EnumIter,
    Display,
)]
#[repr(u8)]
pub enum Reg {
    /// Holds the value just produced by an expression.
    RRET,
    /// Address scratch: label loads and return addresses.
    RADDR,
    R2,
    R3,
    R4,
    /// Left operand of a binary operator.
    REXPR,
    /// Frame base.
    RSB,
    /// Stack top.
    RSP,
}

impl Reg {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.to_ascii_uppercase().parse::<Self>() {
            Ok(a) => Ok(a),
            Err(_) => Err(format!("Unknown reg name: {s}")),
        }
    }

    pub fn id(self) -> u8 {
        self.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!(Reg::parse("rret"), Ok(Reg::RRET));
        assert_eq!(Reg::parse("Rsp"), Ok(Reg::RSP));
        assert!(Reg::parse("hoge").is_err());
    }

    #[test]
    fn ids() {
        assert_eq!(Reg::RRET.id(), 0);
        assert_eq!(Reg::REXPR.id(), 5);
        assert_eq!(Reg::RSP.id(), 7);
        assert_eq!(Reg::try_from(6).ok(), Some(Reg::RSB));
        assert!(Reg::try_from(8).is_err());
        assert_eq!(Reg::REXPR.to_string(), "REXPR");
    }
}
