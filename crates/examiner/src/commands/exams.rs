use chrono::Local;
use color_eyre::eyre::bail;
use color_eyre::Result;
use portal_client::{Applied, ListView, Notification, ResultLoader};
use questions::{ListFilter, NewTest, Page, ResultFilter, TestResult};

use super::read_json;
use crate::cli::TestsCmd;
use crate::output::{clip, page_footer, print_json};
use crate::runtime::Runtime;

pub async fn run(action: TestsCmd, rt: &Runtime) -> Result<()> {
    match action {
        TestsCmd::Create { file } => {
            let draft: NewTest = read_json(&file)?;
            draft.check()?;
            let created = rt.api()?.create_test(&draft).await?;
            rt.notifier.notify(Notification::success(format!(
                "test \"{}\" created with {} questions: {}",
                draft.title,
                draft.question_count(),
                created.id
            )));
            if rt.json {
                print_json(&created)?;
            }
        }
        TestsCmd::Duplicate { id } => {
            let created = rt.api()?.duplicate_test(&id).await?;
            rt.notifier.notify(Notification::success(format!(
                "test {id} duplicated as {}",
                created.id
            )));
            if rt.json {
                print_json(&created)?;
            }
        }
        TestsCmd::Results {
            id,
            search,
            status,
            paging,
        } => {
            let mut filter = ResultFilter::new();
            if let Some(search) = search {
                filter.set_search(search);
            }
            filter.set_status(status);
            filter.set_per_page(rt.per_page(paging.per_page));
            filter.goto_page(paging.page);

            let loader = ResultLoader {
                api: rt.api()?,
                test_id: id.clone(),
            };
            let mut view: ListView<ResultFilter, Page<TestResult>> =
                ListView::new(filter, rt.notifier.clone())
                    .with_empty_message(format!("No results for test {id} yet"));
            if view.refresh(&loader).await == Applied::Failed {
                bail!("could not load results of test {id}");
            }
            if let Some(page) = view.data() {
                if rt.json {
                    print_json(page)?;
                } else {
                    print_results(page);
                }
            }
        }
    }
    Ok(())
}

fn print_results(page: &Page<TestResult>) {
    println!(
        "{:<24} {:<24} {:<12} {:>7} {:>7}  {}",
        "STUDENT", "NAME", "STATUS", "SCORE", "%", "SUBMITTED"
    );
    for r in &page.items {
        let percentage = r
            .percentage()
            .map(|p| format!("{p:.1}"))
            .unwrap_or_else(|| "-".into());
        let submitted = r
            .submitted_at
            .map(|at| at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<24} {:<24} {:<12} {:>7} {:>7}  {}",
            clip(&r.student_id, 24),
            clip(&r.student_name, 24),
            r.status.to_string(),
            format!("{}/{}", r.score, r.max_score),
            percentage,
            submitted
        );
    }
    println!("{}", page_footer(page));
}
