//! Substring filter used by the contact list.
//!
//! Names match case-insensitively; phone numbers match literally, so a
//! query of `555` finds `+1 555-1234` but `5551234` does not.
//!
//! Case is folded one character at a time, so a character whose lowercase
//! form expands (`İ` lowercases to `i̇`) still lines up with its single-char
//! counterpart.

use crate::models::Contact;

/// Contacts whose name or phone contains `query`, in input order.
///
/// A blank query returns every contact.
pub fn filter<'a>(contacts: &'a [Contact], query: &str) -> Vec<&'a Contact> {
    if query.trim().is_empty() {
        return contacts.iter().collect();
    }

    let needle: Vec<char> = query.chars().map(fold_case).collect();
    contacts
        .iter()
        .filter(|contact| matches(contact, query, &needle))
        .collect()
}

fn matches(contact: &Contact, query: &str, needle: &[char]) -> bool {
    contains_folded(&contact.name, needle)
        || contact
            .phone
            .as_deref()
            .map(|phone| phone.contains(query))
            .unwrap_or(false)
}

/// Map a character to a single-char case key: upper-case it (keeping the
/// original when that expands, as `ß` does), then take the first char of its
/// lowercase form.
fn fold_case(c: char) -> char {
    let mut upper = c.to_uppercase();
    let upper = match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    };
    upper.to_lowercase().next().unwrap_or(upper)
}

fn contains_folded(haystack: &str, needle: &[char]) -> bool {
    if needle.is_empty() {
        return true;
    }
    let folded: Vec<char> = haystack.chars().map(fold_case).collect();
    folded.windows(needle.len()).any(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts() -> Vec<Contact> {
        vec![
            Contact::new(1, "Alice Smith").with_phone("+1 555-1234"),
            Contact::new(2, "bob jones"),
            Contact::new(3, "Carol").with_phone("0207 946 0000"),
        ]
    }

    fn ids(found: Vec<&Contact>) -> Vec<i64> {
        found.iter().map(|c| c.id.get()).collect()
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let all = contacts();
        assert_eq!(ids(filter(&all, "")), vec![1, 2, 3]);
        assert_eq!(ids(filter(&all, "   ")), vec![1, 2, 3]);
    }

    #[test]
    fn test_name_is_case_insensitive() {
        let all = contacts();
        assert_eq!(ids(filter(&all, "ALICE")), vec![1]);
        assert_eq!(ids(filter(&all, "Jones")), vec![2]);
        assert_eq!(ids(filter(&all, "o")), vec![2, 3]);
    }

    #[test]
    fn test_case_folds_per_character() {
        let all = vec![
            Contact::new(1, "i"),
            Contact::new(2, "İstanbul Office"),
            Contact::new(3, "Straße"),
        ];
        assert_eq!(ids(filter(&all, "İ")), vec![1, 2]);
        assert_eq!(ids(filter(&all, "istanbul")), vec![2]);
        assert_eq!(ids(filter(&all, "STRASSE")), Vec::<i64>::new());
        assert_eq!(ids(filter(&all, "STRAßE")), vec![3]);
    }

    #[test]
    fn test_phone_is_literal() {
        let all = contacts();
        assert_eq!(ids(filter(&all, "555")), vec![1]);
        assert!(filter(&all, "5551234").is_empty());
        assert_eq!(ids(filter(&all, "946 0")), vec![3]);
    }

    #[test]
    fn test_result_is_an_ordered_subset() {
        let all = contacts();
        let found = filter(&all, "a");
        assert!(found.iter().all(|c| all.contains(c)));
        assert_eq!(ids(found), vec![1, 3]);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter(&[], "ann").is_empty());
    }
}
