pub mod context;
pub mod extractor;
pub mod form;
pub mod handlers;
pub mod lemmatizer;
pub mod normalizer;
pub mod parser;
pub mod ranker;
pub mod report;
pub mod session;
pub mod skills;
pub mod stopwords;
pub mod vectorizer;
