//! Properties of the pure components: filter, validator and color assigner.

use address_book_mcp_server::color::{color_for, PastelColor};
use address_book_mcp_server::models::{Contact, ContactDraft};
use address_book_mcp_server::search::filter;
use address_book_mcp_server::validation::validate;

fn sample() -> Vec<Contact> {
    vec![
        Contact::new(1, "Ann Lee").with_phone("+1 555-1234"),
        Contact::new(2, "Bob").with_phone("555"),
        Contact::new(3, "bobby tables"),
        Contact::new(4, "Carol").with_phone("0800 BOB"),
        Contact::new(5, "Dave").with_email("bob@example.com"),
    ]
}

#[test]
fn test_scenario_e() {
    let contacts = vec![Contact::new(1, "Bob").with_phone("555")];
    let found = filter(&contacts, "bo");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Bob");
    assert!(filter(&contacts, "999").is_empty());
}

#[test]
fn test_filter_results_match_and_keep_order() {
    let contacts = sample();
    for query in ["bo", "BOB", "555", "a", "-", " ", "zzz", "BOB@"] {
        let found = filter(&contacts, query);

        if query.trim().is_empty() {
            assert_eq!(found.len(), contacts.len());
            continue;
        }

        for contact in &found {
            let name_hit = contact.name.to_lowercase().contains(&query.to_lowercase());
            let phone_hit = contact.phone.as_deref().map_or(false, |p| p.contains(query));
            assert!(name_hit || phone_hit, "{:?} should not match {}", contact, query);
        }

        let positions: Vec<usize> = found
            .iter()
            .map(|c| contacts.iter().position(|x| x == *c).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn test_phone_match_is_case_sensitive_and_email_ignored() {
    let contacts = sample();
    // Carol matches through her phone, which is compared literally
    let ids: Vec<i64> = filter(&contacts, "BOB").iter().map(|c| c.id.get()).collect();
    assert_eq!(ids, vec![2, 3, 4]);
    let ids: Vec<i64> = filter(&contacts, "bob").iter().map(|c| c.id.get()).collect();
    assert_eq!(ids, vec![2, 3]);
    // Dave's email is not searched
    assert!(!filter(&contacts, "example").iter().any(|c| c.id.get() == 5));
}

#[test]
fn test_blank_name_is_never_submittable() {
    for name in ["", " ", "\t", "   \n"] {
        for phone in ["", "123", "abc"] {
            for email in ["", "a@b.co", "bad"] {
                assert!(!validate(&ContactDraft::new(name, phone, email)).is_submittable());
            }
        }
    }
}

#[test]
fn test_phone_charset_property() {
    let allowed = ['0', '1', '5', '9', '+', '-', ' '];
    let disallowed = ['a', '(', ')', '.', '#', '/', 'x', '*'];

    for a in allowed {
        for b in allowed {
            let phone = format!("{}{}1", a, b);
            assert!(validate(&ContactDraft::new("Ann", phone.as_str(), "")).phone.is_valid());
        }
        for bad in disallowed {
            let phone = format!("{}{}", a, bad);
            assert!(validate(&ContactDraft::new("Ann", phone.as_str(), "")).phone.is_invalid());
        }
    }
}

#[test]
fn test_color_is_pure_and_in_palette() {
    for name in ["", "Ann", "Bob", "Zoë", "李小龍", "polygenelubricants"] {
        let first = color_for(name);
        assert_eq!(color_for(name), first);
        assert!(PastelColor::PALETTE.contains(&first));
    }
}
