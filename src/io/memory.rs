use super::ReadAt;
use anyhow::Result;
use async_trait::async_trait;

/// Archive bytes held in memory, for decoder tests
pub struct MemoryReader {
    data: Vec<u8>,
}

impl MemoryReader {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }
}

#[async_trait]
impl ReadAt for MemoryReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<usize> {
        let start = (offset as usize).min(self.data.len());
        let n = buf.len().min(self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_are_clamped_to_the_end() {
        let reader = MemoryReader::new(b"abcdef".to_vec());
        let mut buf = [0u8; 4];
        assert_eq!(reader.read_at(4, &mut buf).await.unwrap(), 2);
        assert_eq!(&buf[..2], b"ef");
        assert_eq!(reader.read_at(10, &mut buf).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn read_exact_fails_past_the_end() {
        let reader = MemoryReader::new(b"abc".to_vec());
        let mut buf = [0u8; 4];
        assert!(reader.read_exact_at(0, &mut buf).await.is_err());
    }
}
