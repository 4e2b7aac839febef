use async_trait::async_trait;
use indoc::indoc;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use xliffsync::formats::{ResourceFormat, read_source_input, read_source_lines};
use xliffsync::{
    Error, SourceLine, TargetDescriptor, TargetSettings, TranslationBackend, TranslationState,
    process_target, read_catalog,
};

/// Prefixes every text with the target language.
struct Tagging(&'static str);

#[async_trait]
impl TranslationBackend for Tagging {
    fn name(&self) -> &'static str {
        "tagging"
    }

    async fn translate(&self, text: &str) -> Result<String, Error> {
        Ok(format!("[{}] {}", self.0, text))
    }
}

struct Offline;

#[async_trait]
impl TranslationBackend for Offline {
    fn name(&self) -> &'static str {
        "offline"
    }

    async fn translate(&self, _text: &str) -> Result<String, Error> {
        Err(Error::translation("offline", "connection refused"))
    }
}

const STRINGS_V1: &str = indoc! {r#"
    <?xml version="1.0" encoding="utf-8"?>
    <root>
      <data name="Title" xml:space="preserve">
        <value>Welcome</value>
      </data>
      <data name="Save" xml:space="preserve">
        <value>Save</value>
        <comment>Button label</comment>
      </data>
      <data name="Cancel" xml:space="preserve">
        <value>Cancel</value>
      </data>
    </root>
"#};

const STRINGS_V2: &str = indoc! {r#"
    <?xml version="1.0" encoding="utf-8"?>
    <root>
      <data name="Title" xml:space="preserve">
        <value>Welcome back</value>
      </data>
      <data name="Save" xml:space="preserve">
        <value>Save</value>
      </data>
      <data name="Quit" xml:space="preserve">
        <value>Quit</value>
      </data>
    </root>
"#};

fn write_source(dir: &Path, content: &str) {
    let path = dir.join("Resources").join("Strings.resx");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn settings() -> TargetSettings {
    TargetSettings {
        xliff_base_dir: PathBuf::from("MultilingualResources"),
        resources_base_dir: PathBuf::from("Resources"),
        format: ResourceFormat::Resx,
    }
}

fn target(language: &str) -> TargetDescriptor {
    TargetDescriptor {
        language: language.to_string(),
        xliff_path: PathBuf::from(format!("MyApp.{}.xlf", language)),
        resource_path: PathBuf::from(format!("Strings.{}.resx", language)),
    }
}

#[tokio::test]
async fn test_catalog_lifecycle_across_runs() {
    let dir = TempDir::new().unwrap();
    let settings = settings();
    let de = target("de");
    let xlf = dir.path().join("MultilingualResources/MyApp.de.xlf");
    let resx = dir.path().join("Resources/Strings.de.resx");

    // first run: translate everything
    write_source(dir.path(), STRINGS_V1);
    let source =
        read_source_input(dir.path(), "Resources/Strings.resx", None, "en", Some("MyApp")).unwrap();
    let report = process_target(&source, &settings, &de, dir.path(), Some(&Tagging("de")))
        .await
        .unwrap();
    assert!(report.changed);
    assert_eq!(report.stats.needs_review, 3);
    assert!(
        std::fs::read_to_string(&xlf)
            .unwrap()
            .contains(r#"original="MYAPP/RESOURCES/STRINGS.RESX""#)
    );

    // a translator signs off on "Save" and "Title"
    let edited = std::fs::read_to_string(&xlf)
        .unwrap()
        .replace(
            r#"<target state="needs-review-translation">[de] Save</target>"#,
            r#"<target state="final">Speichern</target>"#,
        )
        .replace(
            r#"<target state="needs-review-translation">[de] Welcome</target>"#,
            r#"<target state="final">Willkommen</target>"#,
        );
    std::fs::write(&xlf, edited).unwrap();

    // second run: source changed, backend offline
    write_source(dir.path(), STRINGS_V2);
    let source =
        read_source_input(dir.path(), "Resources/Strings.resx", None, "en", Some("MyApp")).unwrap();
    let report = process_target(&source, &settings, &de, dir.path(), Some(&Offline))
        .await
        .unwrap();
    assert!(report.changed);
    assert_eq!(report.stats.new, 1);
    assert_eq!(report.stats.needs_review, 1);
    assert_eq!(report.stats.total, 3);

    let catalog = read_catalog(&xlf).unwrap();
    assert_eq!(catalog.keys().collect::<Vec<_>>(), vec!["Title", "Save", "Quit"]);

    let title = catalog.get("Title").unwrap();
    assert!(title.needs_review());
    assert_eq!(title.target.value, "Willkommen");
    assert!(title.note.is_some());

    let save = catalog.get("Save").unwrap();
    assert_eq!(
        save.target.state,
        Some(TranslationState::Other("final".to_string()))
    );
    assert_eq!(save.target.value, "Speichern");

    let quit = catalog.get("Quit").unwrap();
    assert!(quit.is_new());
    assert_eq!(quit.target.value, "Quit");

    // the untranslated unit is left out of the resource file
    let lines = read_source_lines(&resx, ResourceFormat::Resx).unwrap();
    assert_eq!(
        lines,
        vec![
            SourceLine::new("Title", "Willkommen"),
            SourceLine::new("Save", "Speichern"),
        ]
    );
}

#[tokio::test]
async fn test_targets_are_independent() {
    let dir = TempDir::new().unwrap();
    let settings = settings();
    write_source(dir.path(), STRINGS_V1);
    let source =
        read_source_input(dir.path(), "Resources/Strings.resx", None, "en", Some("MyApp")).unwrap();

    let de = process_target(&source, &settings, &target("de"), dir.path(), Some(&Tagging("de")))
        .await
        .unwrap();
    let fr = process_target(&source, &settings, &target("fr"), dir.path(), None)
        .await
        .unwrap();

    assert_eq!(de.stats.needs_review, 3);
    assert_eq!(fr.stats.new, 3);
    let fr_xlf = std::fs::read_to_string(dir.path().join("MultilingualResources/MyApp.fr.xlf")).unwrap();
    assert!(fr_xlf.contains(r#"target-language="fr""#));
    assert!(!fr_xlf.contains("[de]"));
}

#[tokio::test]
async fn test_duplicate_catalog_ids_abort_the_target() {
    let dir = TempDir::new().unwrap();
    let settings = settings();
    write_source(dir.path(), STRINGS_V1);
    let xlf = dir.path().join("MultilingualResources/MyApp.de.xlf");
    std::fs::create_dir_all(xlf.parent().unwrap()).unwrap();
    std::fs::write(
        &xlf,
        indoc! {r#"
            <xliff version="1.2"><file source-language="en" datatype="xml" original="x"><body>
              <trans-unit id="Save"><source>Save</source></trans-unit>
              <trans-unit id="Save"><source>Save</source></trans-unit>
            </body></file></xliff>
        "#},
    )
    .unwrap();
    let source =
        read_source_input(dir.path(), "Resources/Strings.resx", None, "en", Some("MyApp")).unwrap();

    let err = process_target(&source, &settings, &target("de"), dir.path(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DuplicateKey(_)));
    assert!(!dir.path().join("Resources/Strings.de.resx").exists());
}

#[tokio::test]
async fn test_source_with_bom_is_read() {
    let dir = TempDir::new().unwrap();
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(br#"{ "greeting": "Hello" }"#);
    std::fs::write(dir.path().join("strings.json"), bytes).unwrap();

    let source = read_source_input(dir.path(), "strings.json", None, "en", None).unwrap();
    assert_eq!(source.lines, vec![SourceLine::new("greeting", "Hello")]);
}

#[tokio::test]
async fn test_signed_off_unit_with_alternatives_is_kept() {
    let dir = TempDir::new().unwrap();
    let settings = settings();
    write_source(dir.path(), STRINGS_V1);
    let xlf = dir.path().join("MultilingualResources/MyApp.de.xlf");
    std::fs::create_dir_all(xlf.parent().unwrap()).unwrap();
    std::fs::write(
        &xlf,
        indoc! {r#"
            <xliff version="1.2"><file source-language="en" datatype="xml" original="x"><body>
              <trans-unit id="Title" xml:space="preserve">
                <source>Welcome</source>
                <target state="signed-off">Willkommen</target>
                <alt-trans origin="mt">
                  <source>Welcome!</source>
                  <target>Herzlich willkommen</target>
                </alt-trans>
              </trans-unit>
              <trans-unit id="Save" xml:space="preserve">
                <source>Save</source>
                <target state="signed-off">Speichern</target>
              </trans-unit>
              <trans-unit id="Cancel" xml:space="preserve">
                <source>Cancel</source>
                <target state="signed-off">Abbrechen</target>
              </trans-unit>
            </body></file></xliff>
        "#},
    )
    .unwrap();
    let source =
        read_source_input(dir.path(), "Resources/Strings.resx", None, "en", Some("MyApp")).unwrap();

    let report = process_target(&source, &settings, &target("de"), dir.path(), Some(&Tagging("de")))
        .await
        .unwrap();

    assert!(!report.changed);
    assert_eq!(report.stats.needs_review, 0);
    let catalog = read_catalog(&xlf).unwrap();
    let title = catalog.get("Title").unwrap();
    assert_eq!(title.source.value.as_deref(), Some("Welcome"));
    assert_eq!(title.target.value, "Willkommen");
    assert_eq!(
        title.target.state,
        Some(TranslationState::Other("signed-off".to_string()))
    );
    assert_eq!(title.note, None);
}
