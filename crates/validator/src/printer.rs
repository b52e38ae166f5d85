#![cfg(feature = "std")]

//! Instruction-level dump of a code section.

use crate::{opcode::*, utils::read_i16};
use container::alloy_primitives::hex;

/// Prints one line per instruction with its immediate bytes, if any.
pub fn print_code(code: &[u8]) {
    let mut i = 0;
    while i < code.len() {
        let op = code[i];
        let Some(opcode) = &OPCODE_INFO[op as usize] else {
            println!("Unknown opcode: 0x{op:02X}");
            i += 1;
            continue;
        };

        if opcode.immediate_size() != 0 && i + opcode.immediate_size() as usize >= code.len() {
            println!("Malformed code: immediate out of bounds");
            break;
        }

        print!("{}", opcode.name());
        if opcode.immediate_size() != 0 {
            let immediate = &code[i + 1..i + 1 + opcode.immediate_size() as usize];
            print!(" : 0x{}", hex::encode(immediate));
            if opcode.immediate_size() == 2 {
                print!(" ({})", read_i16(immediate));
            }
        }
        println!();

        let mut rjumpv_additional_immediates = 0;
        if op == RJUMPV {
            let max_index = code[i + 1] as usize;
            let len = max_index + 1;
            rjumpv_additional_immediates = len * 2;

            // +1 is for the max_index byte.
            if i + 1 + rjumpv_additional_immediates >= code.len() {
                println!("Malformed code: immediate out of bounds");
                break;
            }

            for entry in 0..len {
                let offset = read_i16(&code[i + 2 + 2 * entry..]);
                println!("RJUMPV[{entry}]: 0x{:04X} ({offset})", offset as u16);
            }
        }

        i += 1 + opcode.immediate_size() as usize + rjumpv_additional_immediates;
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::hex;

    #[test]
    fn sanity_print() {
        super::print_code(&hex!("6001e200ffff00"));
    }
}
