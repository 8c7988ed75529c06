use super::operations::MethodPlan;
use super::schemas::{ClassPlan, EnumPlan, ModelPlan};
use crate::model::ApiInfo;

/// Everything a target needs to render: resolved names, types and member
/// lists, with all uniquification already applied.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    pub info: ApiInfo,
    pub namespace: String,
    pub clients: Vec<ClientPlan>,
    /// Retained models in document order.
    pub models: Vec<ModelPlan>,
}

impl GenerationPlan {
    pub fn model(&self, name: &str) -> Option<&ModelPlan> {
        self.models.iter().find(|m| m.name() == name)
    }

    pub fn client(&self, name: &str) -> Option<&ClientPlan> {
        self.clients.iter().find(|c| c.name == name)
    }

    pub fn enums(&self) -> impl Iterator<Item = &EnumPlan> {
        self.models.iter().filter_map(ModelPlan::as_enum)
    }

    pub fn classes(&self) -> impl Iterator<Item = &ClassPlan> {
        self.models.iter().filter_map(ModelPlan::as_class)
    }
}

/// One client class: the operations sharing a tag.
#[derive(Debug, Clone)]
pub struct ClientPlan {
    pub tag: String,
    /// Type name, e.g. `PetsClient`.
    pub name: String,
    pub methods: Vec<MethodPlan>,
}

impl ClientPlan {
    /// Interface name, e.g. `IPetsClient`.
    pub fn interface_name(&self) -> String {
        format!("I{}", self.name)
    }
}
