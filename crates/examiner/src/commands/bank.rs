use std::collections::BTreeMap;

use color_eyre::eyre::{WrapErr, bail};
use color_eyre::Result;
use futures::future::join_all;
use portal_client::{Applied, ListView, Notification, QuestionLoader};
use questions::{ListFilter, Page, Question, QuestionFilter, QuestionKind};
use strum::IntoEnumIterator;

use super::read_json;
use crate::cli::{QuestionFilterArgs, QuestionsCmd};
use crate::output::{clip, page_footer, print_json};
use crate::runtime::Runtime;

pub async fn run(action: QuestionsCmd, rt: &Runtime) -> Result<()> {
    match action {
        QuestionsCmd::List { kind, filter } => list(kind, &filter, rt).await,
        QuestionsCmd::Create { kind, file } => {
            let raw: serde_json::Value = read_json(&file)?;
            let question = Question::from_draft(kind, raw)
                .wrap_err_with(|| format!("payload is not a {kind} question"))?;
            let created = rt.api()?.create_question(&question).await?;
            rt.notifier.notify(Notification::success(format!(
                "{kind} question created: {}",
                created.id
            )));
            if rt.json {
                print_json(&created)?;
            }
            Ok(())
        }
        QuestionsCmd::Duplicate { kind, id } => {
            let created = rt.api()?.duplicate_question(kind, &id).await?;
            rt.notifier.notify(Notification::success(format!(
                "{kind} question {id} duplicated as {}",
                created.id
            )));
            if rt.json {
                print_json(&created)?;
            }
            Ok(())
        }
    }
}

fn build_filter(args: &QuestionFilterArgs, rt: &Runtime) -> QuestionFilter {
    let mut filter = QuestionFilter::new();
    if let Some(search) = &args.search {
        filter.set_search(search.clone());
    }
    filter.set_topic(args.topic.clone());
    filter.set_subtopic(args.subtopic.clone());
    filter.set_difficulty(args.difficulty);
    filter.set_per_page(rt.per_page(args.paging.per_page));
    filter.goto_page(args.paging.page);
    filter
}

/// One list view per bank, refreshed concurrently.
async fn list(kind: Option<QuestionKind>, args: &QuestionFilterArgs, rt: &Runtime) -> Result<()> {
    let api = rt.api()?;
    let kinds: Vec<QuestionKind> = match kind {
        Some(kind) => vec![kind],
        None => QuestionKind::iter().collect(),
    };
    let filter = build_filter(args, rt);

    let loaders: Vec<QuestionLoader> = kinds
        .iter()
        .map(|&kind| QuestionLoader {
            api: api.clone(),
            kind,
        })
        .collect();
    let mut views: Vec<ListView<QuestionFilter, Page<Question>>> = kinds
        .iter()
        .map(|kind| {
            ListView::new(filter.clone(), rt.notifier.clone())
                .with_empty_message(format!("No {kind} questions match the current filters"))
        })
        .collect();

    let outcomes = join_all(
        views
            .iter_mut()
            .zip(&loaders)
            .map(|(view, loader)| view.refresh(loader)),
    )
    .await;

    if rt.json {
        let pages: BTreeMap<String, &Page<Question>> = kinds
            .iter()
            .zip(&views)
            .filter_map(|(kind, view)| view.data().map(|page| (kind.to_string(), page)))
            .collect();
        print_json(&pages)?;
    } else {
        for (kind, view) in kinds.iter().zip(&views) {
            if let Some(page) = view.data() {
                print_page(*kind, page);
            }
        }
    }

    if outcomes.iter().all(|o| *o == Applied::Failed) {
        bail!("could not load any question bank");
    }
    Ok(())
}

fn print_page(kind: QuestionKind, page: &Page<Question>) {
    println!("{kind} questions");
    println!("{:<26} {:<8} {:<16} {}", "ID", "LEVEL", "TOPIC", "QUESTION");
    for q in &page.items {
        println!(
            "{:<26} {:<8} {:<16} {}",
            clip(q.id(), 26),
            q.difficulty(),
            clip(q.topic(), 16),
            clip(q.title(), 60)
        );
    }
    println!("{}\n", page_footer(page));
}
