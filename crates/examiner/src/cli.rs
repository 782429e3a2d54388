use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use questions::{Difficulty, QuestionKind, ResultStatus};

#[derive(Parser)]
#[command(
    name = "examiner",
    version,
    about = "Assessment portal client: question banks, tests, students and forms"
)]
pub struct Cli {
    /// Print raw JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Log level override (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub cmd: Cmd,
}

#[derive(Subcommand)]
pub enum Cmd {
    /// Manage the stored bearer token
    Token {
        #[command(subcommand)]
        action: TokenCmd,
    },
    /// Browse, create and duplicate questions
    Questions {
        #[command(subcommand)]
        action: QuestionsCmd,
    },
    /// Create and duplicate tests, review results
    Tests {
        #[command(subcommand)]
        action: TestsCmd,
    },
    /// Browse students
    Students {
        #[command(subcommand)]
        action: StudentsCmd,
    },
    /// Assign students to a test
    Assign {
        #[arg(long)]
        test: String,
        /// Student id, repeatable
        #[arg(long = "student", required = true)]
        students: Vec<String>,
    },
    /// Profile form: show, save, fill in
    Profile {
        #[command(subcommand)]
        action: ProfileCmd,
    },
    /// Offline rearrange question tools
    Rearrange {
        #[command(subcommand)]
        action: RearrangeCmd,
    },
}

#[derive(Subcommand)]
pub enum TokenCmd {
    Set { token: String },
    Show,
    Clear,
}

#[derive(Args, Clone, Default)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    /// Defaults to `default_per_page` from the configuration
    #[arg(long)]
    pub per_page: Option<u32>,
}

#[derive(Args, Clone, Default)]
pub struct QuestionFilterArgs {
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub topic: Option<String>,
    #[arg(long)]
    pub subtopic: Option<String>,
    #[arg(long)]
    pub difficulty: Option<Difficulty>,
    #[command(flatten)]
    pub paging: PageArgs,
}

#[derive(Subcommand)]
pub enum QuestionsCmd {
    /// List one bank, or every bank when no kind is given
    List {
        kind: Option<QuestionKind>,
        #[command(flatten)]
        filter: QuestionFilterArgs,
    },
    Create {
        kind: QuestionKind,
        /// JSON file with the question payload
        #[arg(long)]
        file: PathBuf,
    },
    Duplicate { kind: QuestionKind, id: String },
}

#[derive(Subcommand)]
pub enum TestsCmd {
    Create {
        /// JSON file with the test draft
        #[arg(long)]
        file: PathBuf,
    },
    Duplicate { id: String },
    Results {
        id: String,
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        status: Option<ResultStatus>,
        #[command(flatten)]
        paging: PageArgs,
    },
}

#[derive(Subcommand)]
pub enum StudentsCmd {
    List {
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        branch: Option<String>,
        #[arg(long)]
        year: Option<u8>,
        #[arg(long)]
        semester: Option<u8>,
        #[command(flatten)]
        paging: PageArgs,
    },
}

#[derive(Subcommand)]
pub enum ProfileCmd {
    Show,
    Save {
        #[arg(long)]
        file: PathBuf,
    },
    /// Fill in the profile form interactively
    Fill,
}

#[derive(Subcommand)]
pub enum RearrangeCmd {
    /// Evaluate a candidate order against the question's answer key
    Check {
        #[arg(long)]
        file: PathBuf,
        /// Item ids, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        order: Vec<String>,
        /// Also print the explanation
        #[arg(long)]
        explain: bool,
    },
    /// Print the items in a shuffled presentation order
    Shuffle {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_assign_with_repeated_students() {
        let cli = Cli::parse_from([
            "examiner", "assign", "--test", "t1", "--student", "s1", "--student", "s2",
        ]);
        match cli.cmd {
            Cmd::Assign { test, students } => {
                assert_eq!(test, "t1");
                assert_eq!(students, vec!["s1", "s2"]);
            }
            _ => panic!("expected assign"),
        }
    }

    #[test]
    fn parses_rearrange_order_list() {
        let cli = Cli::parse_from([
            "examiner", "rearrange", "check", "--file", "q.json", "--order", "c,a,b",
        ]);
        match cli.cmd {
            Cmd::Rearrange {
                action: RearrangeCmd::Check { order, explain, .. },
            } => {
                assert_eq!(order, vec!["c", "a", "b"]);
                assert!(!explain);
            }
            _ => panic!("expected rearrange check"),
        }
    }

    #[test]
    fn parses_question_kind_and_difficulty() {
        let cli = Cli::parse_from([
            "examiner", "questions", "list", "mcq", "--difficulty", "hard", "--page", "2",
        ]);
        match cli.cmd {
            Cmd::Questions {
                action: QuestionsCmd::List { kind, filter },
            } => {
                assert_eq!(kind, Some(QuestionKind::Mcq));
                assert_eq!(filter.difficulty, Some(Difficulty::Hard));
                assert_eq!(filter.paging.page, 2);
            }
            _ => panic!("expected questions list"),
        }
    }
}
