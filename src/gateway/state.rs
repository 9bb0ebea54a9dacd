use std::sync::Arc;

use crate::generation::CompletionBackend;
use crate::kvstore::KeyValueStore;
use crate::pipeline::QueryPipeline;
use crate::vectordb::VectorStore;

pub struct HandlerState<K: KeyValueStore, V: VectorStore, C: CompletionBackend> {
    pub pipeline: Arc<QueryPipeline<K, V, C>>,
}

impl<K: KeyValueStore, V: VectorStore, C: CompletionBackend> Clone for HandlerState<K, V, C> {
    fn clone(&self) -> Self {
        Self {
            pipeline: Arc::clone(&self.pipeline),
        }
    }
}

impl<K: KeyValueStore, V: VectorStore, C: CompletionBackend> HandlerState<K, V, C> {
    pub fn new(pipeline: Arc<QueryPipeline<K, V, C>>) -> Self {
        Self { pipeline }
    }
}
