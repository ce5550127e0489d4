pub mod spvec;
