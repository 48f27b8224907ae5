//! Verb-based commands from the targeting host.
//!
//! ```text
//! SET PAN <speed>     SET TILT <speed>      speed in [-1, 1]
//! SPIN UP | DOWN
//! SAFETY ON | OFF
//! FIRE
//! ```
//!
//! Tokens are whitespace separated and case sensitive. Each line decodes
//! to at most one command; a blank line decodes to none.

use crate::app::commands::{Axis, Command};
use crate::error::{DecodeError, Verb};

pub fn decode(line: &str) -> Result<Option<Command>, DecodeError> {
    let mut tokens = line.split_whitespace();
    let Some(verb) = tokens.next() else {
        return Ok(None);
    };

    let cmd = match verb {
        "SET" => {
            let axis = match tokens.next() {
                Some("PAN") => Axis::Pan,
                Some("TILT") => Axis::Tilt,
                _ => return Err(DecodeError::InvalidArgument(Verb::Set)),
            };
            let speed = parse_speed(tokens.next())?;
            Command::PanTilt { axis, speed }
        }
        "SPIN" => match tokens.next() {
            Some("UP") => Command::Spin { on: true },
            Some("DOWN") => Command::Spin { on: false },
            _ => return Err(DecodeError::InvalidArgument(Verb::Spin)),
        },
        "SAFETY" => match tokens.next() {
            Some("ON") => Command::Safety { on: true },
            Some("OFF") => Command::Safety { on: false },
            _ => return Err(DecodeError::InvalidArgument(Verb::Safety)),
        },
        "FIRE" => Command::Fire { on: true },
        _ => return Err(DecodeError::UnknownVerb),
    };

    if tokens.next().is_some() {
        return Err(DecodeError::TrailingTokens);
    }
    Ok(Some(cmd))
}

fn parse_speed(token: Option<&str>) -> Result<f32, DecodeError> {
    let speed: f32 = token
        .ok_or(DecodeError::InvalidNumber)?
        .parse()
        .map_err(|_| DecodeError::InvalidNumber)?;
    if !speed.is_finite() || !(-1.0..=1.0).contains(&speed) {
        return Err(DecodeError::SpeedOutOfRange);
    }
    Ok(speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_pan_decodes_speed() {
        assert_eq!(decode("SET PAN 0.5"), Ok(Some(Command::pan(0.5))));
        assert_eq!(decode("SET TILT -1"), Ok(Some(Command::tilt(-1.0))));
    }

    #[test]
    fn verbs_without_numbers() {
        assert_eq!(decode("SPIN UP"), Ok(Some(Command::Spin { on: true })));
        assert_eq!(decode("SPIN DOWN"), Ok(Some(Command::Spin { on: false })));
        assert_eq!(decode("SAFETY ON"), Ok(Some(Command::Safety { on: true })));
        assert_eq!(decode("SAFETY OFF"), Ok(Some(Command::Safety { on: false })));
        assert_eq!(decode("FIRE"), Ok(Some(Command::Fire { on: true })));
    }

    #[test]
    fn extra_whitespace_is_tolerated() {
        assert_eq!(decode("  SET   TILT  0.25 "), Ok(Some(Command::tilt(0.25))));
    }

    #[test]
    fn blank_line_is_not_an_error() {
        assert_eq!(decode(""), Ok(None));
        assert_eq!(decode("   "), Ok(None));
    }

    #[test]
    fn bad_second_token_names_the_verb() {
        assert_eq!(
            decode("SET ROLL 0.1"),
            Err(DecodeError::InvalidArgument(Verb::Set))
        );
        assert_eq!(decode("SAFETY"), Err(DecodeError::InvalidArgument(Verb::Safety)));
        assert_eq!(decode("SPIN LEFT"), Err(DecodeError::InvalidArgument(Verb::Spin)));
    }

    #[test]
    fn numbers_are_checked() {
        assert_eq!(decode("SET PAN"), Err(DecodeError::InvalidNumber));
        assert_eq!(decode("SET PAN fast"), Err(DecodeError::InvalidNumber));
        assert_eq!(decode("SET PAN 1.5"), Err(DecodeError::SpeedOutOfRange));
        assert_eq!(decode("SET PAN NaN"), Err(DecodeError::SpeedOutOfRange));
        assert_eq!(decode("SET PAN inf"), Err(DecodeError::SpeedOutOfRange));
    }

    #[test]
    fn unknown_verb_and_case() {
        assert_eq!(decode("JUMP"), Err(DecodeError::UnknownVerb));
        assert_eq!(decode("fire"), Err(DecodeError::UnknownVerb));
    }

    #[test]
    fn trailing_tokens_rejected() {
        assert_eq!(decode("FIRE NOW"), Err(DecodeError::TrailingTokens));
        assert_eq!(decode("SET PAN 0.1 0.2"), Err(DecodeError::TrailingTokens));
    }
}
