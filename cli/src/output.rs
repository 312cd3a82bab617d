use users_core::User;

/// One line per user: id, name, username, email.
pub fn user_line(user: &User) -> String {
    format!("{:>4}  {:<24} @{:<16} {}", user.id, user.name, user.username, user.email)
}

pub fn print_users(users: &[User]) {
    if users.is_empty() {
        println!("No users found.");
        return;
    }
    for user in users {
        println!("{}", user_line(user));
    }
}

pub fn user_details(user: &User) -> Vec<String> {
    let mut lines = vec![
        format!("ID:       {}", user.id),
        format!("Name:     {}", user.name),
        format!("Username: {}", user.username),
        format!("Email:    {}", user.email),
        format!("Phone:    {}", user.phone),
    ];
    if let Some(website) = &user.website {
        lines.push(format!("Website:  {website}"));
    }
    if let Some(address) = &user.address {
        lines.push(format!("Address:  {}, {}", address.street, address.city));
    }
    if let Some(company) = &user.company {
        lines.push(format!("Company:  {}", company.name));
    }
    lines
}

pub fn print_user(user: &User) {
    for line in user_details(user) {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use users_core::{Address, Company};

    use super::*;

    fn user() -> User {
        User {
            id: 1,
            name: "Leanne Graham".to_string(),
            email: "Sincere@april.biz".to_string(),
            phone: "1-770-736-8031".to_string(),
            username: "Bret".to_string(),
            website: None,
            address: None,
            company: None,
        }
    }

    #[test]
    fn details_skip_absent_optional_sections() {
        let lines = user_details(&user());
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| !l.starts_with("Company")));
    }

    #[test]
    fn details_include_address_and_company() {
        let mut u = user();
        u.address = Some(Address {
            street: "Kulas Light".to_string(),
            city: "Gwenborough".to_string(),
            suite: None,
            zipcode: None,
        });
        u.company = Some(Company {
            name: "Romaguera-Crona".to_string(),
            catch_phrase: None,
            bs: None,
        });
        let lines = user_details(&u);
        assert!(lines.contains(&"Address:  Kulas Light, Gwenborough".to_string()));
        assert!(lines.contains(&"Company:  Romaguera-Crona".to_string()));
    }

    #[test]
    fn line_contains_identity_fields() {
        let line = user_line(&user());
        assert!(line.contains("Leanne Graham"));
        assert!(line.contains("@Bret"));
        assert!(line.trim_start().starts_with('1'));
    }
}
