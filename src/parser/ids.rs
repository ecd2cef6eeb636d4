//! 题目 ID 生成

/// ID 来源，由调用方决定生成策略
///
/// 只需要在一次导入以及已加载的题目范围内唯一
pub trait IdSource {
    fn next_id(&mut self) -> String;
}

/// 默认策略：批次时间戳 + 单调计数器
///
/// 时间戳避免与之前导入的题目冲突，计数器保证批次内唯一
#[derive(Debug, Clone)]
pub struct BatchIdGenerator {
    batch: i64,
    counter: u64,
}

impl BatchIdGenerator {
    /// 以当前时间（毫秒）作为批次号
    pub fn new() -> Self {
        Self::with_batch(chrono::Utc::now().timestamp_millis())
    }

    pub fn with_batch(batch: i64) -> Self {
        Self { batch, counter: 0 }
    }
}

impl Default for BatchIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for BatchIdGenerator {
    fn next_id(&mut self) -> String {
        self.counter += 1;
        format!("q-{}-{}", self.batch, self.counter)
    }
}

/// 固定前缀 + 序号，便于测试和可复现的输出
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

impl<T: IdSource + ?Sized> IdSource for &mut T {
    fn next_id(&mut self) -> String {
        (**self).next_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_batch_ids_unique_within_batch() {
        let mut ids = BatchIdGenerator::with_batch(1700000000000);
        let generated: HashSet<_> = (0..100).map(|_| ids.next_id()).collect();
        assert_eq!(generated.len(), 100);
        assert!(generated.contains("q-1700000000000-1"));
    }

    #[test]
    fn test_batches_do_not_collide() {
        let mut first = BatchIdGenerator::with_batch(1);
        let mut second = BatchIdGenerator::with_batch(2);
        assert_ne!(first.next_id(), second.next_id());
    }

    #[test]
    fn test_sequential_ids() {
        let mut ids = SequentialIds::new("t");
        assert_eq!(ids.next_id(), "t-1");
        assert_eq!(ids.next_id(), "t-2");
    }
}
