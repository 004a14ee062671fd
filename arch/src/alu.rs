use crate::op::Opcode;

macro_rules! flag {
    ($cond:expr) => {
        if $cond {
            0x0001
        } else {
            0x0000
        }
    };
}

/// Evaluate `a OP b`. Returns `None` for division by zero and for
/// opcodes that are not ALU operations.
pub fn valu(op: Opcode, a: u16, b: u16) -> Option<u16> {
    use Opcode::*;
    let (sa, sb) = (a as i16, b as i16);
    let shamt = (b & 0xF) as u32;
    Some(match op {
        ADD => a.wrapping_add(b),
        SUB => a.wrapping_sub(b),
        MUL => a.wrapping_mul(b),
        DIV => sa.checked_div(sb).or_else(|| (sb == -1).then(|| sa.wrapping_neg()))? as u16,
        MOD => sa.checked_rem(sb).or_else(|| (sb == -1).then_some(0))? as u16,
        AND => a & b,
        OR => a | b,
        XOR => a ^ b,
        SHL => a.wrapping_shl(shamt),
        SHR => a.wrapping_shr(shamt),
        EQ => flag!(a == b),
        NEQ => flag!(a != b),
        LT => flag!(sa < sb),
        GT => flag!(sa > sb),
        LE => flag!(sa <= sb),
        GE => flag!(sa >= sb),
        _ => return None,
    })
}
