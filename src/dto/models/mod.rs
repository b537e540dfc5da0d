//! Data-modeling DTOs: spaces, containers, views, and data models.

pub mod container;
pub mod data_model;
pub mod query;
pub mod reference;
pub mod space;
pub mod view;

pub use container::{
    Container, ContainerCreate, ContainerPropertyDefinition, EnumValue, PropertyType, UsedFor,
};
pub use data_model::{
    DataModel, DataModelCreate, VIEW_CREATE_OR_REFERENCE, VIEW_OR_REFERENCE, ViewCreateOrReference,
    ViewOrReference,
};
pub use query::{ContainerQuery, DataModelQuery, SpaceQuery, ViewQuery};
pub use reference::{
    ContainerReference, DataModelId, DirectRelationReference, SourceReference, ViewId,
    ViewReference,
};
pub use space::{Space, SpaceCreate};
pub use view::{
    ConnectionProperty, MappedProperty, ReverseDirectRelationProperty, ThroughReference,
    VIEW_PROPERTY, View, ViewCreate, ViewProperty,
};
