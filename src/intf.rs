// FF0F - IF - Interrupt Flag (R/W)
// Bit 0: V-Blank  Interrupt Request (INT 40h)  (1=Request)
// Bit 1: LCD STAT Interrupt Request (INT 48h)  (1=Request)
// Bit 2: Timer    Interrupt Request (INT 50h)  (1=Request)
// Bit 3: Serial   Interrupt Request (INT 58h)  (1=Request)
// Bit 4: Joypad   Interrupt Request (INT 60h)  (1=Request)
//
// Requesters accumulate bits locally; the memory unit folds them into the
// byte at 0xff0f after each advance, so a request is an ordinary bus write.
#[rustfmt::skip]
#[derive(Clone, Copy)]
pub enum Flag {
    VBlank  = 0,
    LcdStat = 1,
    Timer   = 2,
    Serial  = 3,
    Joypad  = 4,
}

impl Flag {
    pub fn mask(self) -> u8 {
        1 << self as u8
    }
}
