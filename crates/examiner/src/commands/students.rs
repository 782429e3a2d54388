use color_eyre::eyre::bail;
use color_eyre::Result;
use portal_client::{Applied, ListView, StudentLoader};
use questions::{ListFilter, StudentFilter, StudentPage};

use crate::cli::StudentsCmd;
use crate::output::{clip, page_footer, print_json};
use crate::runtime::Runtime;

pub async fn run(action: StudentsCmd, rt: &Runtime) -> Result<()> {
    let StudentsCmd::List {
        search,
        branch,
        year,
        semester,
        paging,
    } = action;

    let mut filter = StudentFilter::new();
    if let Some(search) = search {
        filter.set_search(search);
    }
    filter.set_branch(branch);
    filter.set_year_of_study(year);
    filter.set_semester(semester);
    filter.set_per_page(rt.per_page(paging.per_page));
    filter.goto_page(paging.page);

    let loader = StudentLoader { api: rt.api()? };
    let mut view: ListView<StudentFilter, StudentPage> =
        ListView::new(filter, rt.notifier.clone())
            .with_empty_message("No students match the current filters");
    if view.refresh(&loader).await == Applied::Failed {
        bail!("could not load students");
    }

    if let Some(students) = view.data() {
        if rt.json {
            print_json(students)?;
        } else {
            print_students(students);
        }
    }
    Ok(())
}

fn print_students(students: &StudentPage) {
    println!(
        "{:<24} {:<24} {:<12} {:<8} {:>4} {:>4}",
        "ID", "NAME", "ROLL NO", "BRANCH", "YEAR", "SEM"
    );
    for s in &students.page.items {
        println!(
            "{:<24} {:<24} {:<12} {:<8} {:>4} {:>4}",
            clip(&s.id, 24),
            clip(&s.name, 24),
            s.roll_no.as_deref().unwrap_or("-"),
            s.branch.as_deref().unwrap_or("-"),
            s.year_of_study.map(|y| y.to_string()).unwrap_or_else(|| "-".into()),
            s.semester.map(|y| y.to_string()).unwrap_or_else(|| "-".into()),
        );
    }
    println!("{}", page_footer(&students.page));

    let meta = &students.meta;
    if !meta.branches.is_empty() {
        println!("branches: {}", meta.branches.join(", "));
    }
    if !meta.years.is_empty() {
        let years: Vec<String> = meta.years.iter().map(u8::to_string).collect();
        println!("years: {}", years.join(", "));
    }
    if !meta.semesters.is_empty() {
        let semesters: Vec<String> = meta.semesters.iter().map(u8::to_string).collect();
        println!("semesters: {}", semesters.join(", "));
    }
}
