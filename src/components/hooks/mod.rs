pub mod use_near_end;

pub(crate) use use_near_end::use_near_end;
