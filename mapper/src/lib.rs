//! # shape_mapper
//!
//! Property-by-property mapping between two struct types, planned once per type pair
//! and cached.
//!
//! ```ignore
//! use shape_mapper::{Mappable, MapperCache};
//!
//! #[derive(Mappable, Clone, Default)]
//! struct Order { id: u32, total: f64 }
//!
//! #[derive(Mappable, Clone, Default)]
//! struct OrderRow { id: u64, total: f32 }
//!
//! let mapper = MapperCache::global().get_mapper::<Order, OrderRow>()?;
//! let row = mapper.map(&Order { id: 7, total: 12.5 })?;
//! assert_eq!(mapper.reverse_map(&row)?.total, 12.5);
//! ```
//!
//! Properties are matched by name. When every input property exists on the output with
//! the same type the mapper copies values directly; otherwise each pair of property
//! types is coerced (numeric casts, text conversion, enum casts, element-wise container
//! copies, nested structs). Both directions are planned up front, so a pair that only
//! converts one way is refused when the mapper is built, as are properties holding
//! external resources such as sockets, files or raw pointers.

// lets `#[derive(Mappable)]` output, which names `::shape_mapper`, compile in this crate
extern crate self as shape_mapper;

mod cache;
mod config;
mod constants;
mod error;
mod key;
mod mapper;
mod plan;
mod reflect;
mod shape;
pub mod support;
mod value;

#[cfg(test)]
mod fixtures;

pub use cache::MapperCache;
pub use config::MapperConfig;
pub use constants::{DEFAULT_MAX_DEPTH, ENV_LOG_PLANS, ENV_MAX_DEPTH, ENV_TRACE_LEVEL};
pub use error::{Error, ErrorKind, ReportExt, Result};
pub use key::TypePairKey;
pub use mapper::{CompiledMapper, Mapper};
pub use plan::{
    CapabilityGuard, MappingPlan, OperationKind, PairPlan, PlanBuilder, PlanIndex,
    PropertyOperation, Strategy, is_symmetric,
};
pub use reflect::{FromValue, IntoValue, Mappable, Reflect};
pub use shape::{
    ArrayShape, CapabilityKind, Classification, CollectionShape, ComplexShape, ContainerKind,
    EnumShape, EnumVariant, PrimitiveKind, PropertyDescriptor, Shape, ShapeKind, ShapeRegistry,
    TypeRef, TypeShape, short_type_name,
};
pub use shape_mapper_macros::Mappable;
pub use value::{EnumValue, Primitive, Value, ValueError};
