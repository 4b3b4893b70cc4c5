#![allow(dead_code)]

use flowguard::prelude::*;
use std::time::Duration;

/// Generate a sign-up CSV dataset
///
/// Every `invalid_every`-th row fails at least one check (too young, bad
/// email, or a taken username, in rotation). Zero disables invalid rows.
pub fn generate_signup_csv(num_records: usize, invalid_every: usize) -> String {
    let mut csv = String::from("username,email,age\n");

    for i in 0..num_records {
        let invalid = invalid_every != 0 && i % invalid_every == 0;
        let line = match (invalid, i % 3) {
            (true, 0) => format!("user{},user{}@example.com,9\n", i, i),
            (true, 1) => format!("user{},user{}.example.com,30\n", i, i),
            (true, _) => "admin,admin@example.com,30\n".to_string(),
            (false, _) => format!("user{},user{}@example.com,{}\n", i, i, 18 + i % 60),
        };
        csv.push_str(&line);
    }

    csv
}

/// Sign-up rules whose directory lookup takes `latency`
pub fn signup_rules(latency: Duration) -> SignupRules {
    SignupRules::new(UsernameDirectory::new(["admin", "root", "support"], latency))
}
