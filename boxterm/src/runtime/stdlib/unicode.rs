// :unicode, utf8 only

use crate::runtime::bitstring::Bitstring;
use crate::runtime::error::{RuntimeError, RuntimeResult};
use crate::runtime::interpreter::Interpreter;
use crate::runtime::module_runtime::ModuleRegistry;
use crate::runtime::values::Term;
use num_traits::ToPrimitive;

pub(super) fn load(registry: &mut ModuleRegistry) {
    registry.register_native("unicode", "characters_to_binary", 1, |_, args| {
        characters_to_binary(&args[0])
    });
    registry.register_native("unicode", "characters_to_binary", 3, characters_to_binary_3);
}

fn characters_to_binary_3(_: &Interpreter, args: &[Term]) -> RuntimeResult<Term> {
    for encoding in &args[1..] {
        if !matches!(encoding, Term::Atom(name) if name == "utf8" || name == "unicode") {
            return Err(RuntimeError::InterpreterError(
                "encodings other than utf8 are not yet implemented".to_string(),
            ));
        }
    }
    characters_to_binary(&args[0])
}

fn invalid_chardata() -> RuntimeError {
    RuntimeError::argument_error(1, "not valid character data (an iodata term)")
}

/// Converts chardata (binaries, code points and nested lists of both) to a
/// binary. Stops at the first invalid code point or byte sequence and returns
/// `{:error | :incomplete, converted, rest}`.
fn characters_to_binary(data: &Term) -> RuntimeResult<Term> {
    let mut items = Vec::new();
    flatten_chardata(data, &mut items)?;

    let mut converted = String::new();
    for (index, item) in items.iter().enumerate() {
        match item {
            Term::String(text) => converted.push_str(text),
            Term::Bitstring(bits) => {
                let bytes = bits.to_bytes().ok_or_else(invalid_chardata)?;
                match std::str::from_utf8(&bytes) {
                    Ok(text) => converted.push_str(text),
                    Err(err) => {
                        let valid = err.valid_up_to();
                        converted.push_str(&String::from_utf8_lossy(&bytes[..valid]));
                        let tag = if err.error_len().is_some() { "error" } else { "incomplete" };
                        let rest = Term::Bitstring(Bitstring::from_bytes(&bytes[valid..]));
                        return Ok(failure(tag, converted, rest, &items[index + 1..]));
                    }
                }
            }
            Term::Integer(code) => match code.to_u32().and_then(char::from_u32) {
                Some(c) => converted.push(c),
                None => {
                    return Ok(failure("error", converted, item.clone(), &items[index + 1..]))
                }
            },
            _ => return Err(invalid_chardata()),
        }
    }
    Ok(Term::String(converted))
}

fn failure(tag: &str, converted: String, invalid: Term, remaining: &[Term]) -> Term {
    // A trailing invalid binary is returned bare, anything else as a list.
    let rest = if remaining.is_empty() && invalid.is_bitstring() {
        invalid
    } else {
        let mut rest = vec![invalid];
        rest.extend_from_slice(remaining);
        Term::list(rest)
    };
    Term::tuple(vec![Term::atom(tag), Term::String(converted), rest])
}

fn flatten_chardata(data: &Term, items: &mut Vec<Term>) -> RuntimeResult<()> {
    match data {
        Term::List(list) if list.is_proper() => {
            for item in list.data() {
                flatten_chardata(item, items)?;
            }
            Ok(())
        }
        Term::String(_) | Term::Integer(_) => {
            items.push(data.clone());
            Ok(())
        }
        Term::Bitstring(bits) if bits.is_binary() => {
            items.push(data.clone());
            Ok(())
        }
        _ => Err(invalid_chardata()),
    }
}
