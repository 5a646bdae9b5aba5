use ta::indicators::SimpleMovingAverage;
use ta::Next;

use crate::market::model::PriceBar;

/// 最近 period 根K线的收盘均价（bars 按日期降序），数据不足返回 None
pub fn close_ma(bars: &[PriceBar], period: usize) -> Option<f64> {
    window_ma(bars, period, |b| b.close)
}

/// 最近 period 根K线的平均成交量（股）
pub fn volume_ma(bars: &[PriceBar], period: usize) -> Option<f64> {
    window_ma(bars, period, |b| b.volume)
}

fn window_ma(bars: &[PriceBar], period: usize, field: impl Fn(&PriceBar) -> f64) -> Option<f64> {
    if period == 0 || bars.len() < period {
        return None;
    }
    let mut sma = SimpleMovingAverage::new(period).unwrap();
    let mut value = 0.0;
    // SMA 按时间正序喂入，窗口满后的末值即为窗口均值
    for bar in bars[..period].iter().rev() {
        value = sma.next(field(bar));
    }
    Some(value)
}
