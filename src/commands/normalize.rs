use nu_plugin::{EngineInterface, EvaluatedCall, PluginCommand};
use nu_protocol::{Category, Example, LabeledError, PipelineData, Signature, SyntaxShape, Type};

use crate::ops;
use crate::TrendsPlugin;

use super::util;

pub struct Normalize;

impl PluginCommand for Normalize {
    type Plugin = TrendsPlugin;

    fn name(&self) -> &str {
        "trends normalize"
    }

    fn description(&self) -> &str {
        "Show the normalized form and keywords of a topic"
    }

    fn signature(&self) -> Signature {
        Signature::build(self.name())
            .input_output_type(Type::Nothing, Type::record())
            .required("topic", SyntaxShape::String, "Topic to normalize")
            .category(Category::Experimental)
    }

    fn search_terms(&self) -> Vec<&str> {
        vec!["normalize", "topic", "keywords", "clean"]
    }

    fn examples(&self) -> Vec<Example<'_>> {
        vec![Example {
            example: r#"trends normalize "Breaking: AI Chatbots!!""#,
            description: "Lowercase, strip punctuation, extract keywords",
            result: None,
        }]
    }

    fn run(
        &self,
        _plugin: &TrendsPlugin,
        _engine: &EngineInterface,
        call: &EvaluatedCall,
        _input: PipelineData,
    ) -> Result<PipelineData, LabeledError> {
        let topic: String = call.req(0)?;
        let head = call.head;
        Ok(PipelineData::Value(
            util::from_json(&ops::op_normalize(&topic), head),
            None,
        ))
    }
}
