#![no_main]
use bd_spdx_export::config::ExportConfig;
use bd_spdx_export::pipeline::Exporter;
use bd_spdx_export::source::SnapshotSource;
use libfuzzer_sys::fuzz_target;

/// Fuzz snapshot parsing and the full export of whatever it contains.
fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(source) = SnapshotSource::from_json(s) else {
        return;
    };
    let config = ExportConfig::default();
    let Ok(names) = bd_spdx_export::source::ProjectResolver::project_names(&source) else {
        return;
    };
    if let Some(project) = names.first()
        && let Ok(outcome) = Exporter::new(&source, &config).export(project, "1.0")
    {
        let _ = outcome.document.to_json_string();
    }
});
