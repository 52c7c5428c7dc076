use crate::bill::Line;
use crate::cbc::{Code, NOTE_KEY_LEGAL, Note};
use crate::regimes::pt::exemption;
use crate::rules::{ErrorTree, Fields, Issue, each_validate, positive, zero_or_positive};
use crate::tax::CATEGORY_VAT;

use super::EXT_KEY_EXEMPTION;

const MIN_NOTE_LENGTH: usize = 5;

fn is_exemption_note(n: &Note) -> bool {
    n.key.as_str() == NOTE_KEY_LEGAL && n.src.as_str() == EXT_KEY_EXEMPTION
}

fn exemption_code(line: &Line) -> Option<&Code> {
    line.combo(CATEGORY_VAT).and_then(|c| c.ext.get(EXT_KEY_EXEMPTION))
}

/// Add the legal text of the line's exemption unless an exemption note is
/// already there.
pub(super) fn normalize_line(line: &mut Line) {
    let Some(ex) = exemption_code(line).and_then(|c| exemption(c.as_str())) else {
        return;
    };
    if line.notes.iter().any(is_exemption_note) {
        return;
    }
    line.notes.push(Note::legal(ex.pt).src(EXT_KEY_EXEMPTION).code(ex.code));
}

pub(super) fn validate_line(line: &Line) -> Result<(), ErrorTree> {
    let mut f = Fields::new();
    f.field("quantity", &line.quantity, [positive()]);
    if let Err(msg) = check_exemption_notes(&line.notes, exemption_code(line)) {
        f.fault("notes", Issue::invalid(msg));
    }
    f.tree(
        "discounts",
        each_validate(&line.discounts, |d| {
            Fields::new().field("amount", &d.amount, [zero_or_positive()]).finish()
        }),
    );
    f.finish()
}

/// At most one exemption note, present exactly when the line is exempt
/// and carrying the same code.
fn check_exemption_notes(notes: &[Note], code: Option<&Code>) -> Result<(), String> {
    let mut count = 0;
    for (i, n) in notes.iter().enumerate().filter(|(_, n)| is_exemption_note(n)) {
        let Some(code) = code else {
            return Err(format!("({i}: unexpected exemption note)"));
        };
        if count > 0 {
            return Err(format!("({i}: too many exemption notes)"));
        }
        if &n.code != code {
            return Err(format!("({i}: note code {} must match extension {code})", n.code));
        }
        if n.text.trim().chars().count() < MIN_NOTE_LENGTH {
            return Err(format!("({i}: note text must be at least {MIN_NOTE_LENGTH} characters long)"));
        }
        count += 1;
    }
    match code {
        Some(code) if count == 0 => Err(format!("missing exemption note for code {code}")),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;
    use crate::bill::LineDiscount;
    use crate::org::Item;
    use crate::tax::Combo;

    fn exempt_line(code: &str) -> Line {
        Line::new(dec!(1), Item::new("Consulting", dec!(100)))
            .tax(Combo::new("VAT").key("exempt").ext(EXT_KEY_EXEMPTION, code))
    }

    #[test]
    fn adds_legal_text() {
        let mut line = exempt_line("M07");
        normalize_line(&mut line);
        assert_eq!(line.notes.len(), 1);
        let note = &line.notes[0];
        assert_eq!(note.code.as_str(), "M07");
        assert_eq!(note.src.as_str(), "pt-saft-exemption");
        assert_eq!(note.text, "Isento artigo 9.° do CIVA");

        normalize_line(&mut line);
        assert_eq!(line.notes.len(), 1);
        assert!(validate_line(&line).is_ok());
    }

    #[test]
    fn keeps_custom_note() {
        let mut line = exempt_line("M07").note(Note::legal("Isento artigo 9.°").src(EXT_KEY_EXEMPTION).code("M07"));
        normalize_line(&mut line);
        assert_eq!(line.notes.len(), 1);
        assert_eq!(line.notes[0].text, "Isento artigo 9.°");
    }

    #[test]
    fn exemption_note_rules() {
        let note = |code: &str, text: &str| Note::legal(text).src(EXT_KEY_EXEMPTION).code(code);

        let err = validate_line(&exempt_line("M07")).unwrap_err();
        assert_eq!(err.to_string(), "notes: missing exemption note for code M07.");

        let line = exempt_line("M07").note(note("M01", "Artigo 16.°"));
        assert_eq!(
            validate_line(&line).unwrap_err().to_string(),
            "notes: (0: note code M01 must match extension M07)."
        );

        let line = exempt_line("M07").note(note("M07", "Art."));
        assert_eq!(
            validate_line(&line).unwrap_err().to_string(),
            "notes: (0: note text must be at least 5 characters long)."
        );

        let line = exempt_line("M07").note(note("M07", "Artigo 9.°")).note(note("M07", "Artigo 9.°"));
        assert_eq!(validate_line(&line).unwrap_err().to_string(), "notes: (1: too many exemption notes).");

        let line = Line::new(dec!(1), Item::new("Goods", dec!(10)))
            .tax(Combo::new("VAT").rate("general"))
            .note(note("M07", "Artigo 9.°"));
        assert_eq!(validate_line(&line).unwrap_err().to_string(), "notes: (0: unexpected exemption note).");
    }

    #[test]
    fn quantity_and_discounts() {
        let mut line = Line::new(dec!(0), Item::new("Goods", dec!(10)));
        line.discounts.push(LineDiscount::amount(dec!(-1)));
        let err = validate_line(&line).unwrap_err();
        assert!(err.get("quantity").is_some());
        assert!(err.at("discounts.0.amount").is_some());
    }
}
