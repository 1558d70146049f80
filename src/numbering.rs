//! Document number assignment: prefix + incrementing sequence derived from
//! previously stored numbers. Best effort, read-then-write; concurrent
//! creations are not guarded against.

/// Returns the next full document number for a type, given every number
/// already stored for that type.
///
/// The highest trailing digit run among the stored numbers is incremented;
/// with no prior documents (or none carrying a trailing digit run) the
/// configured start number is used instead.
pub fn next_document_number<'a, I>(existing: I, prefix: &str, start: u64) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let next = match highest_sequence(existing) {
        Some(n) => n + 1,
        None => start,
    };
    format!("{prefix}{next}")
}

/// The largest trailing digit run among the given numbers, or `None` when
/// no stored number ends in digits.
pub fn highest_sequence<'a, I>(numbers: I) -> Option<u64>
where
    I: IntoIterator<Item = &'a str>,
{
    numbers.into_iter().filter_map(trailing_digits).max()
}

fn trailing_digits(s: &str) -> Option<u64> {
    // ASCII digits are one byte each, so the byte offset is a char boundary
    // even when the rest of the string is not ASCII.
    let run_len = s.chars().rev().take_while(char::is_ascii_digit).count();
    if run_len == 0 {
        return None;
    }
    s[s.len() - run_len..].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_prior_documents_uses_start_number() {
        assert_eq!(next_document_number([], "INV-", 100), "INV-100");
    }

    #[test]
    fn increments_highest_stored_number() {
        let stored = ["PREFIX-1042"];
        assert_eq!(next_document_number(stored, "PREFIX-", 1), "PREFIX-1043");
    }

    #[test]
    fn picks_numeric_maximum_not_lexicographic() {
        let stored = ["Q-999", "Q-1042", "Q-7"];
        assert_eq!(next_document_number(stored, "Q-", 1), "Q-1043");
    }

    #[test]
    fn malformed_stored_numbers_fall_back_to_start() {
        let stored = ["DRAFT", "Q-abc"];
        assert_eq!(next_document_number(stored, "Q-", 500), "Q-500");
    }

    #[test]
    fn multi_byte_prefixes_are_handled() {
        let stored = ["№1000"];
        assert_eq!(next_document_number(stored, "№", 1), "№1001");
        assert_eq!(trailing_digits("Rechnung–№"), None);
        assert_eq!(trailing_digits("déjà-42"), Some(42));
    }

    #[test]
    fn ignores_digits_before_the_trailing_run() {
        assert_eq!(trailing_digits("2024-INV-55"), Some(55));
        assert_eq!(trailing_digits("2024-INV-"), None);
    }
}
