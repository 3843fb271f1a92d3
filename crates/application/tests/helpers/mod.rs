#![allow(dead_code)]
#![allow(unused_imports)]

mod mocks;

pub use mocks::{
    a_record, cname_record, InMemoryZoneStore, MockSystemResolver, MockUpstreamClient,
};
