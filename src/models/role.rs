use std::fmt;

/// Access class of an authenticated principal. Every user has exactly one
/// role; it travels inside the token and is trusted for the token's
/// lifetime without a storage re-check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    /// Requester: files tickets and sees only their own.
    Usuario,
    /// Technician: triages, resolves and administers tickets.
    Tecnico,
}

impl Role {
    pub fn parse(s: &str) -> Option<Role> {
        match s {
            "usuario" => Some(Role::Usuario),
            "tecnico" => Some(Role::Tecnico),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Usuario => "usuario",
            Role::Tecnico => "tecnico",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles() {
        assert_eq!(Role::parse("usuario"), Some(Role::Usuario));
        assert_eq!(Role::parse("tecnico"), Some(Role::Tecnico));
        assert_eq!(Role::parse("admin"), None);
        assert_eq!(Role::parse("Tecnico"), None);
    }

    #[test]
    fn round_trips_as_str() {
        assert_eq!(Role::parse(Role::Tecnico.as_str()), Some(Role::Tecnico));
        assert_eq!(Role::parse(Role::Usuario.as_str()), Some(Role::Usuario));
    }
}
