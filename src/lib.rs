#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use gj_encode as encode;
pub use gj_reflect as reflect;

pub use gj_encode::{
    CutoffCollection, DepthPolicy, EncodeConfig, EncodeError, ErrorKind, GroupMode, Marshaller,
    encode_to, marshal, marshal_to_value, write_value,
};
pub use gj_reflect::Reflect;
pub use gj_reflect::derive::Reflect;
