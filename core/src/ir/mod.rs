pub mod analysis;
pub mod builder;
pub mod catalogue;
pub mod err;
pub mod lower;
pub mod module;
pub mod op;
pub mod print;
pub mod value;
pub mod verify;

pub use self::builder::OpBuilder;
pub use self::catalogue::OpCatalogue;
pub use self::err::IrError;
pub use self::lower::{LowerError, lower_chunk};
pub use self::module::Module;
pub use self::op::{OpKind, Operation};
pub use self::value::{Attribute, NumberValue, PackValue, RefValue, ValueId, ValueType};
pub use self::verify::{VerifyError, verify_module};
