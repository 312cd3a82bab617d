use clap::{Args, Parser, Subcommand};
use users_core::{NewUser, UserPatch};

#[derive(Parser, Debug)]
#[command(name = "users", about = "Browse and edit users on a users REST service", version)]
pub struct Cli {
    /// Base URL of the users service
    #[arg(long, global = true, env = "USERS_API_URL")]
    pub base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(
        long,
        global = true,
        env = "USERS_TIMEOUT_SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: Option<u64>,

    /// Debug logging and full error chains
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all users
    List,

    /// Show one user
    Show {
        id: u64,

        /// Ask the service directly instead of the loaded list
        #[arg(long)]
        remote: bool,
    },

    /// Create a user
    Create(CreateArgs),

    /// Update fields of a user
    Update(UpdateArgs),

    /// Delete a user
    Delete { id: u64 },
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub email: String,

    #[arg(long)]
    pub phone: String,

    /// Defaults to the name, lower-cased, without whitespace
    #[arg(long)]
    pub username: Option<String>,
}

impl From<CreateArgs> for NewUser {
    fn from(args: CreateArgs) -> Self {
        NewUser {
            name: args.name,
            email: args.email,
            phone: args.phone,
            username: args.username,
        }
    }
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: u64,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub username: Option<String>,

    #[arg(long)]
    pub website: Option<String>,
}

impl UpdateArgs {
    pub fn patch(&self) -> UserPatch {
        UserPatch {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            username: self.username.clone(),
            website: self.website.clone(),
            ..UserPatch::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_with_optional_username() {
        let cli = Cli::try_parse_from([
            "users", "create", "--name", "Jane Doe", "--email", "jane@example.com", "--phone", "555",
        ])
        .unwrap();
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        let input = NewUser::from(args);
        assert_eq!(input.name, "Jane Doe");
        assert!(input.username.is_none());
    }

    #[test]
    fn update_builds_patch_from_given_flags_only() {
        let cli = Cli::try_parse_from(["users", "update", "3", "--email", "new@example.com"]).unwrap();
        let Command::Update(args) = cli.command else {
            panic!("expected update");
        };
        assert_eq!(args.id, 3);
        let patch = args.patch();
        assert_eq!(patch.email.as_deref(), Some("new@example.com"));
        assert!(patch.name.is_none());
        assert!(!patch.is_empty());
    }

    #[test]
    fn global_flags_are_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "users", "delete", "2", "--base-url", "http://localhost:3000", "--timeout", "3", "-v",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://localhost:3000"));
        assert_eq!(cli.timeout, Some(3));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Delete { id: 2 }));
    }

    #[test]
    fn create_requires_email() {
        let result = Cli::try_parse_from(["users", "create", "--name", "Jane", "--phone", "555"]);
        assert!(result.is_err());
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = Cli::try_parse_from(["users", "list", "--timeout", "0"]);
        assert!(result.is_err());
        let cli = Cli::try_parse_from(["users", "list", "--timeout", "1"]).unwrap();
        assert_eq!(cli.timeout, Some(1));
    }

    #[test]
    fn short_verbose_flag_before_subcommand() {
        let cli = Cli::try_parse_from(["users", "-v", "list"]).unwrap();
        assert!(cli.verbose);
    }
}
