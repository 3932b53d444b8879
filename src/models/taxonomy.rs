//! Model classification enums.
//!
//! Every variant serializes as a plain lowercase string so the persisted
//! document never carries a Rust-specific tagged representation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unrecognized classification string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The string stored in the document.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(UnknownVariant { kind: $kind, value: other.to_string() }),
                }
            }
        }
    };
}

string_enum! {
    /// Model family the weights were trained against.
    BaseModelType, "base model" {
        Any => "any",
        StableDiffusion1 => "sd-1",
        StableDiffusion2 => "sd-2",
        StableDiffusionXL => "sdxl",
        StableDiffusionXLRefiner => "sdxl-refiner",
    }
}

string_enum! {
    /// Role the model plays in a pipeline.
    ModelType, "model type" {
        Onnx => "onnx",
        Main => "main",
        Vae => "vae",
        Lora => "lora",
        ControlNet => "controlnet",
        /// Textual inversion embedding.
        TextualInversion => "embedding",
        IPAdapter => "ip_adapter",
        ClipVision => "clip_vision",
        T2IAdapter => "t2i_adapter",
    }
}

string_enum! {
    /// On-disk layout of the weights.
    ModelFormat, "model format" {
        Diffusers => "diffusers",
        Checkpoint => "checkpoint",
        Lycoris => "lycoris",
        Onnx => "onnx",
        Olive => "olive",
        EmbeddingFile => "embedding_file",
        EmbeddingFolder => "embedding_folder",
        InvokeAI => "invokeai",
    }
}

string_enum! {
    /// UNet variant of a main model.
    ModelVariant, "model variant" {
        Normal => "normal",
        Inpaint => "inpaint",
        Depth => "depth",
    }
}

impl ModelType {
    /// Formats a model of this type may be stored in.
    pub fn allowed_formats(&self) -> &'static [ModelFormat] {
        use ModelFormat as F;
        match self {
            ModelType::Main => &[F::Checkpoint, F::Diffusers, F::Onnx, F::Olive],
            ModelType::Onnx => &[F::Onnx, F::Olive],
            ModelType::Vae => &[F::Checkpoint, F::Diffusers],
            ModelType::Lora => &[F::Lycoris, F::Diffusers],
            ModelType::ControlNet => &[F::Checkpoint, F::Diffusers],
            ModelType::TextualInversion => &[F::EmbeddingFile, F::EmbeddingFolder],
            ModelType::IPAdapter => &[F::InvokeAI],
            ModelType::ClipVision => &[F::Diffusers],
            ModelType::T2IAdapter => &[F::Diffusers],
        }
    }

    /// Check whether `format` is valid for this type.
    pub fn supports(&self, format: ModelFormat) -> bool {
        self.allowed_formats().contains(&format)
    }
}
