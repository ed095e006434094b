
mod listing_extractor_tests;
