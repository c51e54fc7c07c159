/// Format coverage: every container reader feeds the same matcher
mod common;

use anvesh::extractors::{extract_doc, extract_docx, extract_pdf, extract_ppt, extract_pptx, extract_spreadsheet};
use anvesh::{search, SearchOptions, SearchQuery, Section};
use common::DocsBuilder;

fn case_sensitive() -> SearchOptions {
    SearchOptions {
        case_sensitive: true,
        ..Default::default()
    }
}

#[test]
fn test_docx_paragraphs() {
    let docs = DocsBuilder::new().with_docx(
        "memo.docx",
        &["Quarterly Budget", "", "The budget was approved.", "Budget budget BUDGET"],
    );

    let units = extract_docx(&docs.file("memo.docx")).unwrap();
    assert_eq!(units.len(), 4);
    assert_eq!(units[1].text, "");

    let results = search(&SearchQuery::new("budget", vec![docs.path().to_path_buf()])).unwrap();
    assert_eq!(results.len(), 1);
    let lines: Vec<_> = results[0].matches.iter().map(|m| m.line_number).collect();
    assert_eq!(lines, vec![Some(1), Some(3), Some(4)]);
    assert_eq!(results[0].total_occurrences, 5);

    let sensitive = SearchQuery::new("Budget", vec![docs.path().to_path_buf()]).with_options(case_sensitive());
    let results = search(&sensitive).unwrap();
    assert_eq!(results[0].total_occurrences, 2);
}

#[test]
fn test_pptx_shapes_carry_slide_numbers() {
    let docs = DocsBuilder::new().with_pptx(
        "deck.pptx",
        &[vec!["Welcome"], vec!["Roadmap", "Q3 roadmap\nhiring plan"]],
    );

    let units = extract_pptx(&docs.file("deck.pptx")).unwrap();
    assert_eq!(units.len(), 3);
    assert_eq!(units[2].text, "Q3 roadmap\nhiring plan");
    assert_eq!(units[2].section, Some(Section::Slide { number: 2 }));

    let results = search(&SearchQuery::new("roadmap", vec![docs.path().to_path_buf()])).unwrap();
    let matches = &results[0].matches;
    assert_eq!(matches.len(), 2);
    assert!(matches.iter().all(|m| m.section == Some(Section::Slide { number: 2 })));
    assert!(matches[0].display_path().ends_with("deck.pptx (Slide: 2)"));

    let sensitive = SearchQuery::new("Roadmap", vec![docs.path().to_path_buf()]).with_options(case_sensitive());
    assert_eq!(search(&sensitive).unwrap()[0].matches.len(), 1);
}

#[test]
fn test_xlsx_cells_use_one_counter() {
    let docs = DocsBuilder::new().with_xlsx(
        "budget.xlsx",
        &[
            ("Q1", vec![vec!["Item", "Cost"], vec!["Travel", "1200"]]),
            ("Q2", vec![vec!["travel", "900"]]),
        ],
    );

    let units = extract_spreadsheet(&docs.file("budget.xlsx")).unwrap();
    assert_eq!(units.len(), 6);
    assert_eq!(units[4].line_number, 5);
    assert_eq!(units[4].section, Some(Section::Sheet { name: "Q2".to_string() }));

    let results = search(&SearchQuery::new("travel", vec![docs.path().to_path_buf()])).unwrap();
    let matches = &results[0].matches;
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0].line_number, Some(3));
    assert_eq!(matches[0].section, Some(Section::Sheet { name: "Q1".to_string() }));
    assert_eq!(matches[1].line_number, Some(5));

    let sensitive = SearchQuery::new("Travel", vec![docs.path().to_path_buf()]).with_options(case_sensitive());
    assert_eq!(search(&sensitive).unwrap()[0].matches.len(), 1);
}

#[test]
fn test_legacy_doc_paragraphs() {
    let docs = DocsBuilder::new().with_doc("minutes.doc", &["Meeting notes", "Budget review", "Next budget cycle"]);

    let units = extract_doc(&docs.file("minutes.doc")).unwrap();
    let texts: Vec<_> = units.iter().map(|u| u.text.as_str()).collect();
    assert_eq!(texts, vec!["Meeting notes", "Budget review", "Next budget cycle"]);

    let results = search(&SearchQuery::new("budget", vec![docs.path().to_path_buf()])).unwrap();
    let lines: Vec<_> = results[0].matches.iter().map(|m| m.line_number).collect();
    assert_eq!(lines, vec![Some(2), Some(3)]);

    let sensitive = SearchQuery::new("Budget", vec![docs.path().to_path_buf()]).with_options(case_sensitive());
    let results = search(&sensitive).unwrap();
    assert_eq!(results[0].matches.len(), 1);
    assert_eq!(results[0].matches[0].line_number, Some(2));
}

#[test]
fn test_legacy_ppt_slides() {
    let docs = DocsBuilder::new().with_ppt("deck.ppt", &[vec!["Welcome"], vec!["Roadmap", "Q3 roadmap\nhiring plan"]]);

    let units = extract_ppt(&docs.file("deck.ppt")).unwrap();
    assert_eq!(units.len(), 3);
    assert_eq!(units[2].text, "Q3 roadmap\nhiring plan");
    assert_eq!(units[2].section, Some(Section::Slide { number: 2 }));

    let results = search(&SearchQuery::new("roadmap", vec![docs.path().to_path_buf()])).unwrap();
    assert_eq!(results[0].matches.len(), 2);
    assert!(results[0].matches.iter().all(|m| m.section == Some(Section::Slide { number: 2 })));

    let sensitive = SearchQuery::new("Roadmap", vec![docs.path().to_path_buf()]).with_options(case_sensitive());
    assert_eq!(search(&sensitive).unwrap()[0].matches.len(), 1);
}

#[test]
fn test_legacy_xls_cells() {
    let docs = DocsBuilder::new().with_xls(
        "budget.xls",
        &[
            ("Q1", vec![vec!["Item", "Cost"], vec!["Travel", "1200"]]),
            ("Q2", vec![vec!["travel", "900"]]),
        ],
    );

    let units = extract_spreadsheet(&docs.file("budget.xls")).unwrap();
    assert_eq!(units.len(), 6);
    assert_eq!(units[4].text, "travel");
    assert_eq!(units[4].section, Some(Section::Sheet { name: "Q2".to_string() }));

    let results = search(&SearchQuery::new("travel", vec![docs.path().to_path_buf()])).unwrap();
    let lines: Vec<_> = results[0].matches.iter().map(|m| m.line_number).collect();
    assert_eq!(lines, vec![Some(3), Some(5)]);

    let sensitive = SearchQuery::new("Travel", vec![docs.path().to_path_buf()]).with_options(case_sensitive());
    let results = search(&sensitive).unwrap();
    assert_eq!(results[0].matches.len(), 1);
    assert_eq!(results[0].matches[0].section, Some(Section::Sheet { name: "Q1".to_string() }));
}

#[test]
fn test_pdf_pages() {
    let docs = DocsBuilder::new().with_pdf("letter.pdf", "Hello World");

    let units = extract_pdf(&docs.file("letter.pdf")).unwrap();
    assert!(units.iter().any(|u| u.text.contains("Hello World")));
    assert!(units.iter().all(|u| u.section == Some(Section::Page { number: 1 })));

    let results = search(&SearchQuery::new("world", vec![docs.path().to_path_buf()])).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].matches[0].section, Some(Section::Page { number: 1 }));

    let sensitive = SearchQuery::new("WORLD", vec![docs.path().to_path_buf()]).with_options(case_sensitive());
    assert!(search(&sensitive).unwrap().is_empty());
}

#[test]
fn test_pdf_lines_split_inside_one_text_object() {
    let docs = DocsBuilder::new().with_pdf_lines("minutes.pdf", &["Minutes of the meeting", "Budget approved"]);

    let units = extract_pdf(&docs.file("minutes.pdf")).unwrap();
    let lines: Vec<_> = units.iter().map(|u| (u.line_number, u.text.as_str())).collect();
    assert_eq!(lines, vec![(1, "Minutes of the meeting"), (2, "Budget approved")]);

    let results = search(&SearchQuery::new("budget", vec![docs.path().to_path_buf()])).unwrap();
    assert_eq!(results[0].matches.len(), 1);
    assert_eq!(results[0].matches[0].line_number, Some(2));
    assert_eq!(results[0].matches[0].content, "Budget approved");
}

#[test]
fn test_exact_match_only_widens_text_previews() {
    let long_line = format!("needle {}", "x".repeat(300));
    let docs = DocsBuilder::new()
        .with_file("long.txt", format!("{}\n", long_line))
        .with_docx("long.docx", &[long_line.as_str()]);
    let folders = vec![docs.path().to_path_buf()];

    let exact = SearchOptions {
        exact_match: true,
        ..Default::default()
    };
    let results = search(&SearchQuery::new("needle", folders.clone()).with_options(exact)).unwrap();
    for file in &results {
        let content = &file.matches[0].content;
        if file.file_path.ends_with(".txt") {
            assert_eq!(content.chars().count(), long_line.chars().count());
        } else {
            assert_eq!(content.chars().count(), 200);
        }
    }

    let results = search(&SearchQuery::new("needle", folders)).unwrap();
    assert!(results.iter().all(|f| f.matches[0].content.chars().count() == 200));
}
