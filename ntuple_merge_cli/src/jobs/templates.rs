use anyhow::Result;
use handlebars::Handlebars;
use serde_json::json;

use super::{JobSettings, WorkUnit};

const LOCAL_HEADER: &str = r#"#!/bin/bash
MERGE_DIR="{{root}}"
echo -e "  -- merger script -- > Set ntuple path [ ${MERGE_DIR} ]"

"#;

const LOCAL_UNIT: &str = r#"echo "Processing directory: {{name}}"
{{executable}} merge --dir "${MERGE_DIR}/{{name}}" --pat {{pattern}} --out "${MERGE_DIR}/{{name}}.root"

"#;

const LOCAL_FOOTER: &str = r#"echo "All merge jobs completed."
"#;

const BATCH_HEADER: &str = r#"Executable      = {{executable}}
getenv          = True
should_transfer_files = No
+JobFlavour      = "{{job_flavour}}"

"#;

// $(Cluster) and $(Process) are expanded by the scheduler
const BATCH_UNIT: &str = r#"arguments = merge --dir {{dir}} --pat {{pattern}} --out {{output}}
Output          = {{log_dir}}/{{name}}_$(Cluster)_$(Process).out
Error           = {{log_dir}}/{{name}}_$(Cluster)_$(Process).err
Log             = {{log_dir}}/{{name}}_$(Cluster).log
queue

"#;

/// Renders job descriptors from handlebars templates
pub struct DescriptorRenderer {
    handlebars: Handlebars<'static>,
}

impl DescriptorRenderer {
    pub fn new() -> Result<Self> {
        let mut handlebars = Handlebars::new();
        // Output is shell and submit-file text, never HTML
        handlebars.register_escape_fn(handlebars::no_escape);
        handlebars.set_strict_mode(true);

        handlebars.register_template_string("local_header", LOCAL_HEADER)?;
        handlebars.register_template_string("local_unit", LOCAL_UNIT)?;
        handlebars.register_template_string("local_footer", LOCAL_FOOTER)?;
        handlebars.register_template_string("batch_header", BATCH_HEADER)?;
        handlebars.register_template_string("batch_unit", BATCH_UNIT)?;

        Ok(Self { handlebars })
    }

    /// Sequential bash script, one invocation per unit
    pub fn render_local(&self, settings: &JobSettings, units: &[WorkUnit]) -> Result<String> {
        let mut output = self.handlebars.render(
            "local_header",
            &json!({ "root": settings.storage_root.to_string_lossy() }),
        )?;

        for unit in units {
            output.push_str(&self.handlebars.render(
                "local_unit",
                &json!({
                    "name": unit.name,
                    "executable": settings.executable,
                    "pattern": settings.pattern,
                }),
            )?);
        }

        output.push_str(&self.handlebars.render("local_footer", &json!({}))?);
        Ok(output)
    }

    /// HTCondor submission file, one stanza per unit
    pub fn render_batch(&self, settings: &JobSettings, units: &[WorkUnit]) -> Result<String> {
        let mut output = self.handlebars.render(
            "batch_header",
            &json!({
                "executable": settings.executable,
                "job_flavour": settings.job_flavour,
            }),
        )?;

        let log_dir = settings.log_dir.to_string_lossy();
        for unit in units {
            output.push_str(&self.handlebars.render(
                "batch_unit",
                &json!({
                    "name": unit.name,
                    "dir": unit.path.to_string_lossy(),
                    "output": unit.output().to_string_lossy(),
                    "pattern": settings.pattern,
                    "log_dir": log_dir,
                }),
            )?);
        }

        Ok(output)
    }
}
