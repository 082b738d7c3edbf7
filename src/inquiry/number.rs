use rand::Rng;

/// 询价编号来源
pub trait InquiryNumberSource: Send {
    /// 四位数编号，范围 1000..=9999
    fn next_number(&mut self) -> u16;
}

/// 均匀分布的随机编号
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomInquiryNumbers;

impl InquiryNumberSource for RandomInquiryNumbers {
    fn next_number(&mut self) -> u16 {
        rand::thread_rng().gen_range(1000..=9999)
    }
}

/// 固定编号，越界值会被夹到四位数范围内
#[derive(Debug, Clone, Copy)]
pub struct FixedInquiryNumber(pub u16);

impl InquiryNumberSource for FixedInquiryNumber {
    fn next_number(&mut self) -> u16 {
        self.0.clamp(1000, 9999)
    }
}
