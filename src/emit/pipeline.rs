use std::path::Path;

/// Utility for building the contents of the workflow-definition file.
/// Note that it modifies a String reference held internally;
/// read that String to get the file's contents.
#[derive(Debug)]
pub struct PipelineFileBuilder<'a> {
    strbuf: &'a mut String,
}

impl<'a> PipelineFileBuilder<'a> {
    pub fn new(strbuf: &'a mut String) -> Self {
        Self { strbuf }
    }
}

impl PipelineFileBuilder<'_> {
    /// header comment and configfile directive
    pub fn write_prefix(&mut self, config_path: &Path) {
        self.strbuf.clear();
        self.strbuf.push_str("# Workflow definition generated by mgp. Do not edit by hand.\n");
        self.strbuf.push_str("configfile: \"");
        self.strbuf.push_str(&config_path.to_string_lossy());
        self.strbuf.push_str("\"\n\n");
    }

    /// one include line, pointing at the rule file of the chosen package
    pub fn write_include(&mut self, module: &str, package: &str) {
        self.strbuf.push_str("include: \"modules/");
        self.strbuf.push_str(module);
        self.strbuf.push('/');
        self.strbuf.push_str(package);
        self.strbuf.push_str(".smk\"\n");
    }

    /// target rule asking for every retained module's completion flag
    pub fn write_target_rule(&mut self, write_order: &[String]) {
        self.strbuf.push_str("\nrule all:\n    input:\n");
        for module in write_order {
            self.strbuf.push_str(
                "        expand(config[\"work_dir\"] + \"/{sample}/",
            );
            self.strbuf.push_str(module);
            self.strbuf.push_str("/done.flag\", sample=config[\"samples\"]),\n");
        }
    }
}
