//! Pipeline integration tests
//!
//! Loads OCR annotation fixtures from disk and checks the reconstructed
//! lines, pages and written output.

use bhashya_reader::{
    export::PAGE_SEPARATOR_WIDTH, AnnotationLoader, BookPipeline, Classification, CliOverrides,
    Config, LineBuilderOptions, OutputFormat, PipelineConfig, Script, SilentProgress,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn annotation(text: &str, x: i32, y: i32, w: i32, h: i32) -> String {
    format!(
        r#"{{"description":"{}","boundingPoly":{{"vertices":[{{"x":{},"y":{}}},{{"x":{},"y":{}}},{{"x":{},"y":{}}},{{"x":{},"y":{}}}]}}}}"#,
        text,
        x,
        y,
        x + w,
        y,
        x + w,
        y + h,
        x,
        y + h
    )
}

fn write_vision_page(dir: &Path, page: usize, total: usize, annotations: &[String]) {
    let name = AnnotationLoader::page_file_name("page", page, total);
    fs::write(
        dir.join(name),
        format!(r#"{{"textAnnotations":[{}]}}"#, annotations.join(",")),
    )
    .unwrap();
}

/// Three-slot book: page 1 with verse and commentary, page 2 missing,
/// page 3 with a heading, a stray Latin line and a continuation line
fn write_book(root: &Path) -> PathBuf {
    let dir = root.join("gita");
    fs::create_dir_all(&dir).unwrap();

    write_vision_page(
        &dir,
        1,
        12,
        &[
            annotation("whole page text", 0, 0, 800, 1200),
            annotation("प्रथमोऽध्यायः", 200, 20, 200, 30),
            annotation("धर्मक्षेत्रे", 0, 100, 120, 24),
            annotation("कुरुक्षेत्रे", 130, 102, 120, 24),
            annotation("१", 260, 101, 20, 24),
            annotation("॥", 290, 100, 10, 24),
            annotation("अथ", 0, 150, 40, 20),
            annotation("व्याख्या", 50, 151, 80, 20),
        ],
    );
    write_vision_page(
        &dir,
        3,
        12,
        &[
            annotation("whole page text", 0, 0, 800, 1200),
            annotation("Bhagavadgita", 0, 20, 200, 20),
            annotation("इति", 0, 100, 40, 22),
            annotation("श्रीमद्भगवद्गीतासु", 50, 101, 200, 22),
        ],
    );
    dir
}

fn pipeline(format: OutputFormat) -> BookPipeline {
    let config = Config::from_toml(
        r#"
[filter]
title_phrases = ["प्रथमोऽध्यायः"]
"#,
    )
    .unwrap();
    let overrides = CliOverrides {
        format: Some(format),
        ..Default::default()
    };
    BookPipeline::new(config.merge_with_cli(&overrides))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_reconstruction() {
        let temp = TempDir::new().unwrap();
        let dir = write_book(temp.path());

        let fragments = AnnotationLoader::load_book(&dir).unwrap();
        assert_eq!(fragments.len(), 12);

        let book = pipeline(OutputFormat::Tagged)
            .process_fragments("gita", fragments)
            .unwrap();

        let texts: Vec<_> = book.lines.iter().map(|l| l.text()).collect();
        assert_eq!(
            texts,
            vec![
                "प्रथमोऽध्यायः",
                "धर्मक्षेत्रे कुरुक्षेत्रे १ ॥",
                "अथ व्याख्या",
                "Bhagavadgita",
                "इति श्रीमद्भगवद्गीतासु",
            ]
        );
        let numbers: Vec<_> = book.lines.iter().map(|l| l.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);

        assert_eq!(book.effective_count, 3);
        assert_eq!(book.lines[1].classification(), Classification::Moola);
        assert_eq!(book.lines[2].classification(), Classification::Bhaashya);
        assert_eq!(book.lines[4].classification(), Classification::Other);
    }

    #[test]
    fn test_tokens_carry_script_and_segments() {
        let temp = TempDir::new().unwrap();
        let dir = write_book(temp.path());
        let book = pipeline(OutputFormat::Tagged)
            .process_fragments("gita", AnnotationLoader::load_book(&dir).unwrap())
            .unwrap();

        let latin = &book.lines[3].tokens()[0];
        assert_eq!(latin.script(), Script::English);
        assert!(latin.phonetic_segments().is_none());

        let atha = &book.lines[2].tokens()[0];
        assert_eq!(atha.script(), Script::Sanskrit);
        assert_eq!(atha.phonetic_segments().unwrap(), ["अ", "थ्", "अ"]);

        // Danda falls back to the raw string
        let danda = &book.lines[1].tokens()[3];
        assert_eq!(danda.phonetic_segments().unwrap(), ["॥".to_string()]);
    }

    #[test]
    fn test_pages_with_gap() {
        let temp = TempDir::new().unwrap();
        let dir = write_book(temp.path());
        let book = pipeline(OutputFormat::Pages)
            .process_fragments("gita", AnnotationLoader::load_book(&dir).unwrap())
            .unwrap();

        assert_eq!(book.pages.len(), 3);
        assert_eq!(book.pages[0].page_num(), Some(1));
        assert_eq!(book.pages[0].height(), Some(22.0));
        assert_eq!(book.pages[0].effective_count(), 2);

        assert_eq!(book.pages[1].slot(), 2);
        assert_eq!(book.pages[1].page_num(), None);
        assert!(!book.pages[1].has_content());

        assert_eq!(book.pages[2].page_num(), Some(3));
        assert_eq!(book.pages[2].height(), Some(22.0));
    }

    #[test]
    fn test_page_report_written() {
        let temp = TempDir::new().unwrap();
        let dir = write_book(temp.path());
        let out = temp.path().join("out");

        let summary = pipeline(OutputFormat::Pages)
            .process_book_dir(&dir, &out, &SilentProgress)
            .unwrap();
        assert_eq!(summary.book, "gita");
        assert_eq!(summary.fragments, 12);
        assert_eq!(summary.tokens, 10);
        assert_eq!(summary.lines, 5);
        assert_eq!(summary.effective_lines, 3);
        assert_eq!(summary.pages, 3);
        assert_eq!(summary.moola, 1);
        assert_eq!(summary.bhaashya, 1);

        let sep = "=".repeat(PAGE_SEPARATOR_WIDTH);
        let expected = format!(
            "1\t22\n24\tधर्मक्षेत्रे कुरुक्षेत्रे १ ॥\n20\tअथ व्याख्या\n{sep}\n-1\t-1\n{sep}\n3\t22\n22\tइति श्रीमद्भगवद्गीतासु\n",
            sep = sep
        );
        assert_eq!(fs::read_to_string(summary.output_path).unwrap(), expected);
    }

    #[test]
    fn test_continuous_lines_across_pages() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("b");
        fs::create_dir(&dir).unwrap();
        fs::write(
            dir.join("page_1.json"),
            format!("[{}]", annotation("अथ", 0, 500, 40, 20)),
        )
        .unwrap();
        fs::write(
            dir.join("page_2.json"),
            format!("[{}]", annotation("इति", 0, 505, 40, 20)),
        )
        .unwrap();
        let fragments = AnnotationLoader::load_book(&dir).unwrap();

        let reset = BookPipeline::new(PipelineConfig::default())
            .process_fragments("b", fragments.clone())
            .unwrap();
        assert_eq!(reset.lines.len(), 2);

        let config = PipelineConfig {
            lines: LineBuilderOptions::continuous(),
            ..Default::default()
        };
        let continuous = BookPipeline::new(config)
            .process_fragments("b", fragments)
            .unwrap();
        assert_eq!(continuous.lines.len(), 1);
        assert_eq!(continuous.lines[0].page(), 1);
    }

    #[test]
    fn test_json_output_written() {
        let temp = TempDir::new().unwrap();
        let dir = write_book(temp.path());
        let out = temp.path().join("out");

        let summary = pipeline(OutputFormat::Json)
            .process_book_dir(&dir, &out, &SilentProgress)
            .unwrap();
        assert_eq!(summary.output_path, out.join("gita.json"));

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&summary.output_path).unwrap()).unwrap();
        let pages = json.as_array().unwrap();
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0]["lines"][1]["classification"], "BHAASHYA");
        assert!(pages[1]["page_num"].is_null());
        assert!(pages[1]["height"].is_null());
        assert_eq!(pages[2]["lines"][0]["text"], "इति श्रीमद्भगवद्गीतासु");
    }
}
