use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use course_weightings::api::ApiClient;
use course_weightings::notice::Notice;
use course_weightings::session::{Session, COURSE_ENV};
use course_weightings::settings::settings;
use course_weightings::utils::{log_init, log_loading, log_notice, print_view};
use course_weightings::weightings::{CriterionDraft, ItemId, WeightingAggregator};
use rust_decimal::Decimal;
use std::process::ExitCode;
use tracing::subscriber::set_global_default;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "course-weightings", about = "Inspect and edit a course's criteria weightings")]
struct Cli {
    /// Course to operate on; defaults to the session's active course.
    #[arg(long, global = true, env = COURSE_ENV)]
    course: Option<i64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show every criterion with its sub-criteria and extra points.
    Show,
    /// Add a sub-criterion; rejected if it would exceed the criterion's weight.
    AddSub(ItemArgs),
    /// Replace an existing sub-criterion.
    EditSub {
        id: ItemId,
        #[command(flatten)]
        item: ItemArgs,
    },
    DeleteSub {
        id: ItemId,
    },
    /// Add extra (bonus) points to a criterion.
    AddSpecial(ItemArgs),
    EditSpecial {
        id: ItemId,
        #[command(flatten)]
        item: ItemArgs,
    },
    DeleteSpecial {
        id: ItemId,
    },
}

#[derive(Debug, Args)]
struct ItemArgs {
    #[arg(long)]
    criterion: i64,
    #[arg(long)]
    name: String,
    #[arg(long)]
    points: Decimal,
}

impl From<ItemArgs> for CriterionDraft {
    fn from(args: ItemArgs) -> Self {
        CriterionDraft::new(args.name, args.points, args.criterion)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive("course_weightings=info".parse()?))
        .with(
            fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        );
    set_global_default(subscriber).context("failed to set tracing subscriber")?;

    let cli = Cli::parse();
    let s = settings();

    let mut session = Session::from_env()?;
    if let Some(course) = cli.course {
        session.select_course(course);
    }

    let client = ApiClient::new(&s.api, &session)?;
    let aggregator = WeightingAggregator::for_session(client, &session)?;

    log_init(aggregator.backend().base_url(), aggregator.course());
    log_loading(aggregator.course());
    if let Err(e) = aggregator.load_all().await {
        log_notice(&Notice::from_error(&e, &s.messages));
        return Ok(ExitCode::FAILURE);
    }

    let outcome = match cli.command {
        Command::Show => Ok(None),
        Command::AddSub(item) => aggregator
            .upsert_sub_criterion(item.into(), None)
            .await
            .map(|_| Some(&s.messages.saved)),
        Command::EditSub { id, item } => aggregator
            .upsert_sub_criterion(item.into(), Some(id))
            .await
            .map(|_| Some(&s.messages.saved)),
        Command::DeleteSub { id } => aggregator
            .delete_sub_criterion(id)
            .await
            .map(|_| Some(&s.messages.deleted)),
        Command::AddSpecial(item) => aggregator
            .upsert_special_criterion(item.into(), None)
            .await
            .map(|_| Some(&s.messages.saved)),
        Command::EditSpecial { id, item } => aggregator
            .upsert_special_criterion(item.into(), Some(id))
            .await
            .map(|_| Some(&s.messages.saved)),
        Command::DeleteSpecial { id } => aggregator
            .delete_special_criterion(id)
            .await
            .map(|_| Some(&s.messages.deleted)),
    };

    let code = match outcome {
        Ok(done) => {
            if let Some(message) = done {
                log_notice(&Notice::success(message.as_str()));
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log_notice(&Notice::from_error(&e, &s.messages));
            ExitCode::FAILURE
        }
    };

    if let Some(view) = aggregator.view() {
        println!();
        print_view(&view);
    }

    Ok(code)
}
