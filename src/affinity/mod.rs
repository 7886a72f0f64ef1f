pub mod constants;
pub mod pairwise;
pub mod perplexity_search;
pub mod row_conditional;
pub mod symmetrize;
