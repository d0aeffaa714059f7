use clap::{Parser, Subcommand, ValueEnum};
use isa95_space::NodeClass;

#[derive(Parser)]
#[command(
    name = "isa95",
    about = "ISA-95: typed class-property, property and attribute attachment over an address space",
    version
)]
pub struct Cli {
    /// Extension config (TOML with `subtype-policy` / `field-collision`)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the equipment element levels
    Levels {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the ISA-95 types of the bundled schema
    Types {
        /// Restrict to one kind of type
        #[arg(long, value_enum)]
        kind: Option<TypeKind>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check whether an ISA-95 variable type derives from a base type
    CheckSubtype {
        /// Candidate variable type browse name
        candidate: String,

        /// Base variable type browse name
        #[arg(long, default_value = "ISA95PropertyType")]
        base: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Attach one child to a demo parent and show what was created
    Attach {
        /// class-property, property or attribute
        category: String,

        /// Browse name of the new child
        #[arg(long)]
        browse_name: String,

        /// Data type name (ISA-95, standard, or built-in scalar)
        #[arg(long)]
        data_type: String,

        /// Variable type browse name or node id (`ns=2;i=3001`)
        #[arg(long)]
        type_definition: Option<String>,

        /// Initial value; parsed as JSON, otherwise taken as a string
        #[arg(long)]
        value: Option<String>,

        /// Modelling rule (mandatory, optional, ...)
        #[arg(long)]
        modelling_rule: Option<String>,

        /// Create the parent as a new object type of this name instead of an instance
        #[arg(long)]
        parent_type: Option<String>,

        /// Override the subtype policy: strict or lenient
        #[arg(long)]
        subtype_policy: Option<String>,

        /// Override the field collision policy: overwrite or reject
        #[arg(long)]
        field_collision: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TypeKind {
    Object,
    Variable,
    Data,
    Reference,
}

impl TypeKind {
    pub const ALL: [TypeKind; 4] = [
        TypeKind::Object,
        TypeKind::Variable,
        TypeKind::Data,
        TypeKind::Reference,
    ];

    pub fn node_class(self) -> NodeClass {
        match self {
            TypeKind::Object => NodeClass::ObjectType,
            TypeKind::Variable => NodeClass::VariableType,
            TypeKind::Data => NodeClass::DataType,
            TypeKind::Reference => NodeClass::ReferenceType,
        }
    }
}
