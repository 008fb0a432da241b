use std::path::PathBuf;

use clap::Subcommand;

#[derive(Subcommand)]
pub enum TokenCommands {
    /// Issue a signed credential for a user
    Issue {
        /// Subject identifier to embed in the credential
        #[arg(long)]
        user_id: String,

        /// Lifetime in seconds (omit for no expiration)
        #[arg(long, allow_negative_numbers = true)]
        expires_in: Option<i64>,

        /// Signing secret (overrides config file and JWT_SECRET)
        #[arg(long)]
        jwt_secret: Option<String>,

        /// Server config file to read the secret from
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// List projects visible to the current credential
    List {
        /// Only projects owned by the current credential
        #[arg(long)]
        mine: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a project and its files
    Show {
        /// Project ID
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Upload a locally saved project
    Push {
        /// ID of the project in the local mirror
        local_id: String,

        /// Make the uploaded project public
        #[arg(long)]
        public: bool,

        /// Overwrite this remote project instead of creating a new one
        #[arg(long, value_name = "REMOTE_ID")]
        to: Option<String>,
    },

    /// Download a project into the local mirror
    Pull {
        /// Project ID
        id: String,
    },

    /// Delete a project you own
    Delete {
        /// Project ID
        id: String,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum LocalCommands {
    /// List projects saved in the local mirror
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a locally saved project
    Show {
        /// Project ID
        id: String,
    },

    /// Remove a project from the local mirror
    Delete {
        /// Project ID
        id: String,

        /// Skip interactive prompts
        #[arg(long)]
        non_interactive: bool,

        /// Skip confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
}
