//! Types shared by the plan, mapper and cache tests

use std::collections::VecDeque;
use std::ffi::c_void;
use std::net::TcpStream;
use std::sync::Arc;

use crate::Mappable;

// nested pair with distinct child types

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
#[mapper(rename_all = "PascalCase")]
pub struct Origin {
    pub name:  String,
    pub child: OriginChild,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
#[mapper(rename_all = "PascalCase")]
pub struct OriginChild {
    pub number: i32,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
#[mapper(rename_all = "PascalCase")]
pub struct Destination {
    pub name:  String,
    pub child: DestinationChild,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
#[mapper(rename_all = "PascalCase")]
pub struct DestinationChild {
    pub number: i64,
}

// symmetric pair

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct Address {
    pub street: String,
    pub number: u16,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct Person {
    pub name:     String,
    pub age:      u32,
    pub tags:     Vec<String>,
    pub scores:   [u8; 3],
    pub nickname: Option<String>,
    pub address:  Address,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct PersonRecord {
    pub address:  Address,
    pub nickname: Option<String>,
    pub scores:   [u8; 3],
    pub tags:     Vec<String>,
    pub age:      u32,
    pub name:     String,
    pub archived: bool,
}

// enums

#[derive(Mappable, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(i32)]
pub enum Kind {
    #[default]
    First  = 1,
    Second = 2,
}

#[derive(Mappable, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum MirrorKind {
    #[default]
    First  = 1,
    Second = 2,
}

#[derive(Mappable, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum NarrowKind {
    #[default]
    First = 1,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
#[mapper(rename_all = "PascalCase")]
pub struct Tagged {
    pub value:  Kind,
    pub label:  Kind,
    pub mirror: Kind,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
#[mapper(rename_all = "PascalCase")]
pub struct TaggedRow {
    pub value:  i32,
    pub label:  String,
    pub mirror: MirrorKind,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct NarrowTagged {
    #[mapper(rename = "Mirror")]
    pub kind: NarrowKind,
}

// collections and arrays

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct Listing {
    #[mapper(rename = "Value2")]
    pub values: Vec<String>,
    pub counts: Vec<i32>,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct ListingRow {
    #[mapper(rename = "Value2")]
    pub values: VecDeque<String>,
    pub counts: Vec<f64>,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct WithArray {
    pub values: [i32; 3],
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct WithScalar {
    pub values: i32,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct WithLongerArray {
    pub values: [i32; 4],
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct WithSlice {
    pub values: Box<[i32]>,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct WithChildren {
    pub children: Vec<OriginChild>,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct WithChildRows {
    pub children: Vec<DestinationChild>,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct WithChildArray {
    pub children: [OriginChild; 2],
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct WithChildArrayRow {
    pub children: [DestinationChild; 2],
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct WithChildSlice {
    pub children: Box<[OriginChild]>,
}

// recursive types

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct Tree {
    pub name:     String,
    pub children: Vec<Tree>,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct TreeRow {
    pub name:     String,
    pub children: Vec<TreeRow>,
    pub depth:    u8,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct Chain {
    pub value: i16,
    pub next:  Option<Box<Chain>>,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct ChainRow {
    pub value: i64,
    pub next:  Option<Box<ChainRow>>,
}

// optional values

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct Measured {
    pub reading: f32,
    pub note:    Option<u8>,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct MeasuredRow {
    pub reading: Option<f64>,
    pub note:    Option<u32>,
}

#[derive(Mappable, Clone, Debug, Default, PartialEq)]
pub struct MeasuredStrict {
    pub note: u8,
}

// forbidden capabilities

#[derive(Mappable, Clone, Debug, Default)]
#[mapper(capability = "database")]
pub struct DbHandle;

#[derive(Mappable, Clone, Debug, Default)]
pub struct Connection {
    pub name:   String,
    pub socket: Option<Arc<TcpStream>>,
}

#[derive(Mappable, Clone, Debug, Default)]
pub struct ConnectionMirror {
    pub name:   String,
    pub socket: Option<Arc<TcpStream>>,
}

#[derive(Mappable, Clone, Debug, Default)]
pub struct ConnectionRow {
    pub name:   String,
    pub socket: String,
}

#[derive(Mappable, Clone, Debug, Default)]
pub struct ConnectionSummary {
    pub name: String,
}

#[derive(Mappable, Clone, Debug, Default)]
pub struct Pool {
    pub connection: Connection,
}

#[derive(Mappable, Clone, Debug, Default)]
pub struct PoolRow {
    pub connection: Connection,
    pub size:       u8,
}

#[derive(Mappable, Clone, Debug, Default)]
pub struct Repository {
    pub db: DbHandle,
}

#[derive(Mappable, Clone, Debug, Default)]
pub struct RepositoryRow {
    pub db: String,
}

#[derive(Mappable, Clone, Debug, Default)]
pub struct Native {
    pub handle: Option<*mut c_void>,
}

#[derive(Mappable, Clone, Debug, Default)]
pub struct NativeRow {
    pub handle: Option<*mut c_void>,
}

// unconvertible

#[derive(Mappable, Clone, Debug, Default)]
pub struct Plain {
    pub value: i32,
}

#[derive(Mappable, Clone, Debug, Default)]
pub struct Structured {
    pub value: Address,
}
